use fling_engine::{LevelSummary, ReportError, ScoreReporter};
use js_sys::Function;
use wasm_bindgen::JsValue;

/// Score reporter backed by two JS callbacks:
/// `addPoints(points)` and `saveLevel(level, score, totalScore, completed)`.
/// A callback that throws counts as a rejected call.
pub struct JsScoreReporter {
    add_points: Function,
    save_level: Function,
}

impl JsScoreReporter {
    pub fn new(add_points: Function, save_level: Function) -> Self {
        Self {
            add_points,
            save_level,
        }
    }
}

fn rejected(err: JsValue) -> ReportError {
    ReportError::Rejected(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

impl ScoreReporter for JsScoreReporter {
    fn add_points(&mut self, points: u32) -> Result<(), ReportError> {
        self.add_points
            .call1(&JsValue::NULL, &JsValue::from(points))
            .map(|_| ())
            .map_err(rejected)
    }

    fn save_level(&mut self, summary: &LevelSummary) -> Result<(), ReportError> {
        let args = js_sys::Array::of4(
            &JsValue::from(summary.level),
            &JsValue::from(summary.score),
            &JsValue::from(summary.total_score),
            &JsValue::from_bool(summary.completed),
        );
        self.save_level
            .apply(&JsValue::NULL, &args)
            .map(|_| ())
            .map_err(rejected)
    }
}
