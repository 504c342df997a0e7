//! Event file reader
//!
//! Event files are TFRecord streams. Each record is framed as:
//!
//! ```text
//! u64 (LE) payload length | u32 masked CRC of length | payload | u32 masked CRC of payload
//! ```
//!
//! and every payload is a protobuf `Event`. Only the fields needed to recover
//! scalar summaries are declared; `prost` skips the rest.

use std::path::Path;

use prost::Message;

use crate::{Error, Result};

const LENGTH_BYTES: usize = 8;
const CRC_BYTES: usize = 4;

/// Plugin name that marks a tensor summary as a scalar.
const SCALARS_PLUGIN: &str = "scalars";

/// `DT_FLOAT` in the tensor dtype enum.
const DT_FLOAT: i32 = 1;
/// `DT_DOUBLE` in the tensor dtype enum.
const DT_DOUBLE: i32 = 2;

/// One record of an event file.
#[derive(Clone, PartialEq, Message)]
pub struct Event {
    /// Wall-clock time in seconds.
    #[prost(double, tag = "1")]
    pub wall_time: f64,
    /// Global training step.
    #[prost(int64, tag = "2")]
    pub step: i64,
    /// Summary payload, when the event carries one.
    #[prost(message, optional, tag = "5")]
    pub summary: Option<Summary>,
}

/// Collection of tagged summary values.
#[derive(Clone, PartialEq, Message)]
pub struct Summary {
    /// Tagged values.
    #[prost(message, repeated, tag = "1")]
    pub value: Vec<SummaryValue>,
}

/// A single tagged summary value.
#[derive(Clone, PartialEq, Message)]
pub struct SummaryValue {
    /// Metric tag.
    #[prost(string, tag = "1")]
    pub tag: String,
    /// Legacy scalar value.
    #[prost(float, optional, tag = "2")]
    pub simple_value: Option<f32>,
    /// Tensor value (TF2-style summaries).
    #[prost(message, optional, tag = "8")]
    pub tensor: Option<TensorProto>,
    /// Plugin metadata.
    #[prost(message, optional, tag = "9")]
    pub metadata: Option<SummaryMetadata>,
}

/// Summary metadata.
#[derive(Clone, PartialEq, Message)]
pub struct SummaryMetadata {
    /// Owning plugin.
    #[prost(message, optional, tag = "1")]
    pub plugin_data: Option<PluginData>,
}

/// Plugin identification.
#[derive(Clone, PartialEq, Message)]
pub struct PluginData {
    /// Plugin name.
    #[prost(string, tag = "1")]
    pub plugin_name: String,
}

/// Subset of a serialized tensor.
#[derive(Clone, PartialEq, Message)]
pub struct TensorProto {
    /// Element dtype.
    #[prost(int32, tag = "1")]
    pub dtype: i32,
    /// Raw little-endian element bytes.
    #[prost(bytes = "vec", tag = "4")]
    pub tensor_content: Vec<u8>,
    /// Float elements.
    #[prost(float, repeated, tag = "5")]
    pub float_val: Vec<f32>,
    /// Double elements.
    #[prost(double, repeated, tag = "6")]
    pub double_val: Vec<f64>,
}

impl SummaryValue {
    /// Scalar carried by this value, if it is a scalar summary.
    #[must_use]
    pub fn scalar(&self) -> Option<f64> {
        if let Some(v) = self.simple_value {
            return Some(f64::from(v));
        }

        let plugin = self
            .metadata
            .as_ref()
            .and_then(|m| m.plugin_data.as_ref())
            .map(|p| p.plugin_name.as_str());
        if plugin != Some(SCALARS_PLUGIN) {
            return None;
        }
        self.tensor.as_ref().and_then(TensorProto::scalar)
    }
}

impl TensorProto {
    fn scalar(&self) -> Option<f64> {
        if let Some(&v) = self.float_val.first() {
            return Some(f64::from(v));
        }
        if let Some(&v) = self.double_val.first() {
            return Some(v);
        }
        match self.dtype {
            DT_FLOAT => {
                let bytes: [u8; 4] = self.tensor_content.get(..4)?.try_into().ok()?;
                Some(f64::from(f32::from_le_bytes(bytes)))
            }
            DT_DOUBLE => {
                let bytes: [u8; 8] = self.tensor_content.get(..8)?.try_into().ok()?;
                Some(f64::from_le_bytes(bytes))
            }
            _ => None,
        }
    }
}

/// A scalar sample read from an event file.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarEvent {
    /// Summary tag.
    pub tag: String,
    /// Training step.
    pub step: i64,
    /// Recorded value.
    pub value: f64,
}

/// Split a TFRecord stream into payloads.
///
/// A truncated trailing record (a writer still appending) ends the stream.
#[must_use]
pub fn records(bytes: &[u8]) -> Vec<&[u8]> {
    let mut payloads = Vec::new();
    let mut rest = bytes;

    while rest.len() >= LENGTH_BYTES + CRC_BYTES {
        let mut len_bytes = [0u8; LENGTH_BYTES];
        len_bytes.copy_from_slice(&rest[..LENGTH_BYTES]);
        let Ok(len) = usize::try_from(u64::from_le_bytes(len_bytes)) else {
            break;
        };

        let start = LENGTH_BYTES + CRC_BYTES;
        let Some(next) = start
            .checked_add(len)
            .and_then(|end| end.checked_add(CRC_BYTES))
        else {
            break;
        };
        if rest.len() < next {
            break;
        }

        let end = next - CRC_BYTES;
        payloads.push(&rest[start..end]);
        rest = &rest[next..];
    }

    payloads
}

/// Decode every scalar sample in an event stream, in file order.
///
/// # Errors
///
/// Returns error if any record payload is not a valid `Event`.
pub fn decode_scalars(path: &Path, bytes: &[u8]) -> Result<Vec<ScalarEvent>> {
    let mut scalars = Vec::new();

    for payload in records(bytes) {
        let event = Event::decode(payload).map_err(|e| Error::EventFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let Some(summary) = event.summary else {
            continue;
        };
        for value in summary.value {
            if let Some(v) = value.scalar() {
                scalars.push(ScalarEvent {
                    tag: value.tag,
                    step: event.step,
                    value: v,
                });
            }
        }
    }

    Ok(scalars)
}

/// Frame a payload as a TFRecord (CRC fields zeroed; readers here ignore them).
#[must_use]
pub fn frame_record(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(LENGTH_BYTES + 2 * CRC_BYTES + payload.len());
    out.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    out.extend_from_slice(&[0; CRC_BYTES]);
    out.extend_from_slice(payload);
    out.extend_from_slice(&[0; CRC_BYTES]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar_event(step: i64, tag: &str, value: f32) -> Vec<u8> {
        Event {
            wall_time: 0.0,
            step,
            summary: Some(Summary {
                value: vec![SummaryValue {
                    tag: tag.to_string(),
                    simple_value: Some(value),
                    tensor: None,
                    metadata: None,
                }],
            }),
        }
        .encode_to_vec()
    }

    #[test]
    fn test_records_round_trip_framing() {
        let mut stream = frame_record(b"abc");
        stream.extend(frame_record(b""));
        stream.extend(frame_record(b"xyz1"));
        let payloads = records(&stream);
        assert_eq!(payloads, vec![&b"abc"[..], &b""[..], &b"xyz1"[..]]);
    }

    #[test]
    fn test_truncated_tail_ignored() {
        let mut stream = frame_record(&scalar_event(1, "loss", 0.5));
        let second = frame_record(&scalar_event(2, "loss", 0.25));
        stream.extend_from_slice(&second[..second.len() - 3]);

        let scalars = decode_scalars(Path::new("events"), &stream).unwrap();
        assert_eq!(scalars.len(), 1);
        assert_eq!(scalars[0].step, 1);
    }

    #[test]
    fn test_event_without_summary_skipped() {
        let version = Event {
            wall_time: 1.0,
            step: 0,
            summary: None,
        }
        .encode_to_vec();
        let mut stream = frame_record(&version);
        stream.extend(frame_record(&scalar_event(3, "reward", 2.0)));

        let scalars = decode_scalars(Path::new("events"), &stream).unwrap();
        assert_eq!(
            scalars,
            vec![ScalarEvent {
                tag: "reward".to_string(),
                step: 3,
                value: 2.0
            }]
        );
    }

    #[test]
    fn test_scalar_tensor_requires_plugin() {
        let mut value = SummaryValue {
            tag: "loss".to_string(),
            simple_value: None,
            tensor: Some(TensorProto {
                dtype: DT_FLOAT,
                tensor_content: 0.75f32.to_le_bytes().to_vec(),
                float_val: vec![],
                double_val: vec![],
            }),
            metadata: None,
        };
        assert_eq!(value.scalar(), None);

        value.metadata = Some(SummaryMetadata {
            plugin_data: Some(PluginData {
                plugin_name: SCALARS_PLUGIN.to_string(),
            }),
        });
        assert_eq!(value.scalar(), Some(0.75));
    }

    #[test]
    fn test_oversized_length_ends_stream() {
        let mut stream = frame_record(&scalar_event(1, "loss", 0.5));
        stream.extend_from_slice(&(u64::MAX - 12).to_le_bytes());
        stream.extend_from_slice(&[0; CRC_BYTES]);
        stream.extend_from_slice(b"garbage-payload");

        assert_eq!(records(&stream).len(), 1);
        let scalars = decode_scalars(Path::new("events"), &stream).unwrap();
        assert_eq!(scalars.len(), 1);
        assert!(records(&stream[stream.len() - 27..]).is_empty());
    }

    #[test]
    fn test_garbage_payload_is_error() {
        let stream = frame_record(&[0xff, 0xff, 0xff]);
        assert!(decode_scalars(Path::new("events"), &stream).is_err());
    }
}
