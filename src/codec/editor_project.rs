//! Reading back Avidemux project files saved by the user

use crate::domain::errors::DomainError;
use crate::domain::model::Cut;

const SEGMENT_CALL: &str = "app.addSegment(";
const FPS_ASSIGN: &str = "app.video.fps1000";
const FPS_CALL: &str = "app.video.setFps1000(";

/// Cuts and frame rate recovered from a saved project
#[derive(Debug, Clone, PartialEq)]
pub struct EditorProject {
    pub fps: f64,
    pub segments: Vec<Cut>,
}

/// Project stub that makes the editor open `video_path`
pub fn project_preamble(video_path: &str) -> String {
    format!(
        "//AD\nvar app = new Avidemux();\napp.load(\"{}\");\n",
        video_path.replace('\\', "\\\\").replace('"', "\\\"")
    )
}

/// Parse the segments and frame rate of a saved project
pub fn parse_project(text: &str) -> Result<EditorProject, DomainError> {
    let mut segments = Vec::new();
    for call in text.split(SEGMENT_CALL).skip(1) {
        let args = call.split(')').next().unwrap_or_default();
        let values: Vec<&str> = args.split(',').map(str::trim).collect();
        if values.len() < 3 {
            return Err(DomainError::InvalidFormat(format!(
                "Malformed segment: {}{})",
                SEGMENT_CALL, args
            )));
        }
        let start = parse_frame(values[1])?;
        let duration = parse_frame(values[2])?;
        let segment = Cut::checked(start, duration).ok_or_else(|| {
            DomainError::InvalidFormat(format!("Segment out of range: {}{})", SEGMENT_CALL, args))
        })?;
        segments.push(segment);
    }
    if segments.is_empty() {
        return Err(DomainError::MissingField("segments".to_string()));
    }

    let fps1000 = fps_value(text)
        .ok_or_else(|| DomainError::MissingField("frame rate".to_string()))?;
    let fps1000: f64 = fps1000
        .parse()
        .map_err(|_| DomainError::InvalidFormat(format!("Invalid frame rate: {}", fps1000)))?;

    Ok(EditorProject {
        fps: fps1000 / 1000.0,
        segments,
    })
}

fn parse_frame(value: &str) -> Result<i64, DomainError> {
    value
        .parse()
        .map_err(|_| DomainError::InvalidFormat(format!("Invalid frame number: {}", value)))
}

fn fps_value(text: &str) -> Option<&str> {
    if let Some((_, after)) = text.split_once(FPS_ASSIGN) {
        let (_, value) = after.split_once('=')?;
        return value.split(';').next().map(str::trim);
    }
    let (_, after) = text.split_once(FPS_CALL)?;
    after.split(')').next().map(str::trim)
}
