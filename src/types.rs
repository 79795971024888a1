/// Identifier for a stimulus image in the experiment alphabet.
/// Examples: `circle`, `rectangle`, `star`, `triangle`
pub type StimulusId = String;
/// Identifier for an experiment session/participant.
/// Example: `3f6c2b1e-9a0d-4f7e-8c55-2d1a7b9e0c43`
pub type SubjectId = String;
/// Label for the block a persisted row belongs to.
/// Examples: `WM`, `main_run1`, `main_run4`
pub type BlockLabel = String;
/// Duration or timestamp in seconds relative to the session clock.
/// Examples: `0.5`, `2.5`, `131.0412`
pub type Seconds = f64;
/// Key pressed on the response screen.
/// Examples: `1`, `4`
pub type ResponseKey = String;
