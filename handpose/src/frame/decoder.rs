//! Frame payload decoder.
//!
//! Accepts either
//! `{ "handednesses": [...], "landmarks": [[{x,y,z}, ...], ...] }`
//! or a bare `[[{x,y,z}, ...], ...]` without handedness.
//!
//! The hand/joint list structure is strict: anything else fails the whole
//! frame.  Individual coordinates are lenient: a missing or non-numeric axis
//! decodes as 0.0.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, trace};

use super::{FrameError, LandmarkFrame, LandmarkTuple, MAX_HANDS};
use crate::skeleton::JOINT_COUNT;

// ── Wire schema ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TaggedPayload {
    #[serde(default, alias = "handedness", deserialize_with = "lenient_handednesses")]
    handednesses: Vec<String>,
    landmarks: Vec<Vec<RawLandmark>>,
}

#[derive(Debug, Deserialize)]
struct RawLandmark {
    #[serde(default, deserialize_with = "lenient_axis")]
    x: f64,
    #[serde(default, deserialize_with = "lenient_axis")]
    y: f64,
    #[serde(default, deserialize_with = "lenient_axis")]
    z: f64,
}

/// A handedness entry: a bare label, one category, or a ranked list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawHandedness {
    Label(String),
    Ranked(Vec<RawCategory>),
    Single(RawCategory),
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    #[serde(default, rename = "displayName")]
    display_name: Option<String>,
    #[serde(default, rename = "categoryName")]
    category_name: Option<String>,
}

impl RawCategory {
    fn label(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.category_name.as_deref())
    }
}

impl RawHandedness {
    fn label(&self) -> &str {
        let label = match self {
            Self::Label(s) => Some(s.as_str()),
            Self::Ranked(categories) => categories.first().and_then(RawCategory::label),
            Self::Single(category) => category.label(),
        };
        label.unwrap_or("")
    }
}

fn lenient_axis<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value.as_f64() {
        Some(v) if v.is_finite() => Ok(v),
        _ => {
            trace!("non-numeric coordinate {}, using 0.0", value);
            Ok(0.0)
        }
    }
}

/// Handedness never fails a frame: a null or non-list field means no
/// labels, and an unreadable entry becomes "" (unknown).
fn lenient_handednesses<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match Value::deserialize(deserializer)? {
        Value::Array(entries) => entries,
        Value::Null => return Ok(Vec::new()),
        other => {
            debug!("handedness is not a list ({}), ignoring", other);
            return Ok(Vec::new());
        }
    };
    Ok(entries
        .into_iter()
        .map(|entry| match RawHandedness::deserialize(&entry) {
            Ok(h) => h.label().to_string(),
            Err(e) => {
                debug!("unreadable handedness entry {}: {}", entry, e);
                String::new()
            }
        })
        .collect())
}

// ── Decoding ───────────────────────────────────────────────

/// Swap the upstream tracker's mirrored Left/Right labels.
pub fn mirror_handedness(label: &str) -> String {
    match label {
        "Left" => "Right".to_string(),
        "Right" => "Left".to_string(),
        other => other.to_string(),
    }
}

/// Decode one payload into a `LandmarkFrame`.
///
/// Pure: no state is touched, so a failed decode leaves callers' state as it was.
pub fn decode(payload: &[u8]) -> Result<LandmarkFrame, FrameError> {
    let value: Value = serde_json::from_slice(payload)?;
    decode_value(value)
}

/// Decode an already-parsed JSON value.
pub fn decode_value(value: Value) -> Result<LandmarkFrame, FrameError> {
    let (handednesses, hands) = match value {
        Value::Object(_) => {
            let tagged: TaggedPayload = serde_json::from_value(value)
                .map_err(|e| FrameError::Shape(e.to_string()))?;
            (tagged.handednesses, tagged.landmarks)
        }
        Value::Array(_) => {
            let hands: Vec<Vec<RawLandmark>> = serde_json::from_value(value)
                .map_err(|e| FrameError::Shape(e.to_string()))?;
            (Vec::new(), hands)
        }
        other => {
            return Err(FrameError::Shape(format!(
                "expected an object or a list at top level, got {}",
                other
            )))
        }
    };

    if hands.len() > MAX_HANDS {
        debug!("frame carries {} hands, keeping the first {}", hands.len(), MAX_HANDS);
    }

    let mut frame = LandmarkFrame::default();
    for (hand_index, joints) in hands.into_iter().take(MAX_HANDS).enumerate() {
        if joints.len() > JOINT_COUNT {
            debug!(
                "hand {} carries {} joints, ignoring those past {}",
                hand_index,
                joints.len(),
                JOINT_COUNT
            );
        }
        for (joint_index, joint) in joints.into_iter().take(JOINT_COUNT).enumerate() {
            frame.landmarks.push(LandmarkTuple {
                hand_index,
                joint_index,
                position: [joint.x, joint.y, joint.z],
            });
        }
        frame.hand_count += 1;
    }

    frame.handedness = handednesses
        .iter()
        .take(frame.hand_count)
        .map(|label| mirror_handedness(label))
        .collect();

    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joints_json(n: usize) -> String {
        let joints: Vec<String> = (0..n)
            .map(|i| format!(r#"{{"x":{},"y":0.5,"z":-0.1}}"#, i as f64 * 0.01))
            .collect();
        format!("[{}]", joints.join(","))
    }

    #[test]
    fn test_decode_tagged_payload() {
        let payload = format!(
            r#"{{"handednesses":[{{"displayName":"Left"}},{{"displayName":"Right"}}],"landmarks":[{},{}]}}"#,
            joints_json(21),
            joints_json(21)
        );
        let frame = decode(payload.as_bytes()).unwrap();
        assert_eq!(frame.hand_count, 2);
        assert_eq!(frame.landmarks.len(), 42);
        assert_eq!(frame.handedness, vec!["Right".to_string(), "Left".to_string()]);

        let first = frame.landmarks[0];
        assert_eq!((first.hand_index, first.joint_index), (0, 0));
        let last = frame.landmarks[41];
        assert_eq!((last.hand_index, last.joint_index), (1, 20));
        assert!((last.position[0] - 0.2).abs() < 1e-12);
        assert_eq!(last.position[1], 0.5);
        assert_eq!(last.position[2], -0.1);
    }

    #[test]
    fn test_decode_bare_payload() {
        let payload = format!("[{}]", joints_json(21));
        let frame = decode(payload.as_bytes()).unwrap();
        assert_eq!(frame.hand_count, 1);
        assert_eq!(frame.landmarks.len(), 21);
        assert!(frame.handedness.is_empty());
        assert_eq!(frame.handedness_for(0), None);
    }

    #[test]
    fn test_mirror_handedness() {
        assert_eq!(mirror_handedness("Left"), "Right");
        assert_eq!(mirror_handedness("Right"), "Left");
        assert_eq!(mirror_handedness("left"), "left");
        assert_eq!(mirror_handedness("Unknown"), "Unknown");
        assert_eq!(mirror_handedness(""), "");
    }

    #[test]
    fn test_handedness_forms() {
        let payload = r#"{
            "handedness": [
                [{"categoryName":"Left","displayName":"Left","score":0.98,"index":0}],
                "Right"
            ],
            "landmarks": [[{"x":0.1,"y":0.1,"z":0.0}],[{"x":0.2,"y":0.2,"z":0.0}]]
        }"#;
        let frame = decode(payload.as_bytes()).unwrap();
        assert_eq!(frame.handedness_for(0), Some("Right"));
        assert_eq!(frame.handedness_for(1), Some("Left"));
    }

    #[test]
    fn test_category_name_fallback() {
        let payload = r#"{"handednesses":[{"categoryName":"Right"}],"landmarks":[[{"x":0,"y":0,"z":0}]]}"#;
        let frame = decode(payload.as_bytes()).unwrap();
        assert_eq!(frame.handedness_for(0), Some("Left"));
    }

    #[test]
    fn test_unreadable_handedness_keeps_landmarks() {
        let hand = r#"[[{"x":0.1,"y":0.1,"z":0.0},{"x":0.2,"y":0.2,"z":0.0}]]"#;
        for handedness in [
            "[null]",
            r#"[{"displayName":5}]"#,
            "null",
            r#""Left""#,
            r#"{"displayName":"Left"}"#,
        ] {
            let payload = format!(r#"{{"handednesses":{},"landmarks":{}}}"#, handedness, hand);
            let frame = decode(payload.as_bytes())
                .unwrap_or_else(|e| panic!("handedness {} dropped the frame: {:?}", handedness, e));
            assert_eq!(frame.hand_count, 1, "handedness {}", handedness);
            assert_eq!(frame.landmarks.len(), 2, "handedness {}", handedness);
            assert!(
                frame.handedness_for(0).map_or(true, str::is_empty),
                "handedness {} gave {:?}",
                handedness,
                frame.handedness_for(0)
            );
        }
    }

    #[test]
    fn test_unreadable_entry_does_not_shift_others() {
        let payload = r#"{
            "handednesses": [null, {"displayName":"Right"}],
            "landmarks": [[{"x":0,"y":0,"z":0}],[{"x":0,"y":0,"z":0}]]
        }"#;
        let frame = decode(payload.as_bytes()).unwrap();
        assert_eq!(frame.handedness_for(0), Some(""));
        assert_eq!(frame.handedness_for(1), Some("Left"));
    }

    #[test]
    fn test_malformed_fields_become_zero() {
        let payload = r#"[[{"x":"oops","y":0.4},{"x":null,"y":true,"z":0.3},{}]]"#;
        let frame = decode(payload.as_bytes()).unwrap();
        assert_eq!(frame.landmarks.len(), 3);
        assert_eq!(frame.landmarks[0].position, [0.0, 0.4, 0.0]);
        assert_eq!(frame.landmarks[1].position, [0.0, 0.0, 0.3]);
        assert_eq!(frame.landmarks[2].position, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_single_object_is_shape_error() {
        let err = decode(br#"{"x":0.1,"y":0.2,"z":0.3}"#).unwrap_err();
        assert!(matches!(err, FrameError::Shape(_)), "got {:?}", err);
    }

    #[test]
    fn test_flat_joint_list_is_shape_error() {
        let err = decode(br#"[{"x":0.1,"y":0.2,"z":0.3}]"#).unwrap_err();
        assert!(matches!(err, FrameError::Shape(_)), "got {:?}", err);
    }

    #[test]
    fn test_non_record_joint_is_shape_error() {
        let err = decode(b"[[1, 2, 3]]").unwrap_err();
        assert!(matches!(err, FrameError::Shape(_)), "got {:?}", err);
    }

    #[test]
    fn test_scalar_payload_is_shape_error() {
        let err = decode(b"42").unwrap_err();
        assert!(matches!(err, FrameError::Shape(_)), "got {:?}", err);
    }

    #[test]
    fn test_invalid_json() {
        let err = decode(b"{not json").unwrap_err();
        assert!(matches!(err, FrameError::Json(_)), "got {:?}", err);
    }

    #[test]
    fn test_extra_hands_and_joints_truncated() {
        let payload = format!(
            "[{},{},{}]",
            joints_json(25),
            joints_json(21),
            joints_json(21)
        );
        let frame = decode(payload.as_bytes()).unwrap();
        assert_eq!(frame.hand_count, 2);
        assert_eq!(frame.landmarks.len(), 42);
        assert!(frame.landmarks.iter().all(|l| l.joint_index < JOINT_COUNT));
        assert_eq!(frame.hand_landmarks(0).count(), 21);
    }

    #[test]
    fn test_short_hand_kept() {
        let payload = format!("[{}]", joints_json(5));
        let frame = decode(payload.as_bytes()).unwrap();
        assert_eq!(frame.hand_count, 1);
        assert_eq!(frame.landmarks.len(), 5);
    }

    #[test]
    fn test_empty_frame() {
        let frame = decode(br#"{"handednesses":[],"landmarks":[]}"#).unwrap();
        assert_eq!(frame.hand_count, 0);
        assert!(frame.landmarks.is_empty());
    }
}
