use bytes::Bytes;
use log::{info, warn};
use memsim_error::{errinput, errsegment, Error};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::config::{default_segments, DEFAULT_FRAMES, DEFAULT_POLICY};
use crate::page::Page;
use crate::replacer::Policy;
use crate::segment::{build_segments, SegmentDescriptor, SegmentLayout};
use crate::simulator::simulate;
use crate::trace::SimulationResult;
use crate::Result;

/// A simulation request as the web front end sends it.
///
/// `pages` is the raw reference string; `frames` is an integer, given as a
/// number or as a string; `segments` maps segment names to page counts and
/// keeps the caller's key order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationRequest {
    pub pages: String,
    pub frames: Option<Value>,
    pub algorithm: Option<String>,
    pub segments: Option<Map<String, Value>>,
}

impl SimulationRequest {
    pub fn from_json(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body)
            .map_err(|err| Error::InvalidInput(format!("malformed request: {}", err)))
    }

    /// The requested frame count, the default when none was sent, or `None`
    /// when `frames` is not an integer.
    pub fn frame_count(&self) -> Option<i64> {
        match &self.frames {
            None | Some(Value::Null) => Some(DEFAULT_FRAMES),
            Some(Value::Number(number)) => number.as_i64(),
            Some(Value::String(text)) => text.trim().parse().ok(),
            Some(_) => None,
        }
    }

    /// The requested policy. A missing or blank algorithm means the default.
    pub fn policy(&self) -> Result<Policy> {
        match self.algorithm.as_deref().map(str::trim) {
            None | Some("") => Ok(DEFAULT_POLICY),
            Some(name) => name.parse(),
        }
    }

    /// The requested segments, or the default set when none were sent.
    pub fn segment_descriptors(&self) -> Result<Vec<SegmentDescriptor>> {
        let Some(segments) = &self.segments else {
            return Ok(default_segments());
        };

        segments
            .iter()
            .map(|(name, size)| {
                page_count(name, size).map(|count| SegmentDescriptor::new(name.clone(), count))
            })
            .collect()
    }
}

/// Accepts non-negative integers, written either as numbers or as strings.
fn page_count(name: &str, size: &Value) -> Result<usize> {
    let count = match size {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    };

    match count.and_then(|count| usize::try_from(count).ok()) {
        Some(count) => Ok(count),
        None => errsegment!("segment {} has size {}, expected a non-negative integer", name, size),
    }
}

/// Splits a reference string on whitespace and commas, dropping empty tokens.
pub fn parse_reference_string(pages: &str) -> Vec<Page> {
    pages
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(Page::from)
        .collect()
}

/// The combined page-replacement and segmentation result of one request.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResponse {
    #[serde(flatten)]
    pub result: SimulationResult,
    #[serde(flatten)]
    pub layout: SegmentLayout,
    /// Set when the segment sizes were malformed; `layout` is then empty.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_message"
    )]
    pub segment_error: Option<Error>,
}

fn serialize_message<S: Serializer>(
    error: &Option<Error>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match error {
        Some(error) => serializer.serialize_str(&error.to_string()),
        None => serializer.serialize_none(),
    }
}

impl SimulationResponse {
    /// The response body as JSON.
    pub fn to_body(&self) -> Result<Bytes> {
        serde_json::to_vec(self)
            .map(Bytes::from)
            .map_err(|err| Error::Encoding(err.to_string()))
    }
}

/// The body returned in place of a response when a request is rejected.
pub fn error_body(error: &Error) -> Bytes {
    Bytes::from(serde_json::json!({ "error": error.to_string() }).to_string())
}

/// Validates a request, runs the page-replacement simulation and the segment
/// layout, and merges both into one response.
///
/// Invalid pages, frames or algorithm reject the whole request. Invalid
/// segment sizes only empty the segmentation part of the response.
pub fn handle(request: &SimulationRequest) -> Result<SimulationResponse> {
    let pages = parse_reference_string(&request.pages);
    let frames = match request.frame_count() {
        Some(frames) if frames > 0 && !pages.is_empty() => frames,
        _ => return errinput!("Please enter pages and a valid frame count."),
    };
    let frames = usize::try_from(frames)
        .map_err(|_| Error::InvalidInput(format!("frame count {} is too large", frames)))?;
    let policy = request.policy()?;

    let result = simulate(policy, &pages, frames)?;

    let (layout, segment_error) = match request.segment_descriptors() {
        Ok(segments) => (build_segments(&segments), None),
        Err(err) => {
            warn!("returning simulation without segmentation: {}", err);
            (SegmentLayout::default(), Some(err))
        }
    };

    info!(
        "served {} request: {} pages, {} frames, {} segment pages",
        policy,
        pages.len(),
        frames,
        layout.total_pages()
    );

    Ok(SimulationResponse {
        result,
        layout,
        segment_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: Value) -> SimulationRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_reference_string() {
        let pages = parse_reference_string(" 7, 0 ,1,,2\t3\n ");
        let labels: Vec<&str> = pages.iter().map(Page::label).collect();
        assert_eq!(labels, vec!["7", "0", "1", "2", "3"]);

        assert!(parse_reference_string(" , ,, ").is_empty());
    }

    #[test]
    fn test_defaults() -> Result<()> {
        let response = handle(&request(json!({ "pages": "1 2 3 4" })))?;

        assert_eq!(response.result.algorithm, Policy::Fifo);
        assert_eq!(response.result.frames_count, 3);
        assert_eq!(response.result.page_faults, 4);
        assert_eq!(response.layout.total_pages(), 6);
        assert_eq!(response.layout.page_table.translate("Heap", 0), Some(5));
        assert_eq!(response.segment_error, None);
        Ok(())
    }

    #[test]
    fn test_blank_algorithm_is_default() -> Result<()> {
        let response = handle(&request(json!({ "pages": "1", "algorithm": "  " })))?;
        assert_eq!(response.result.algorithm, Policy::Fifo);
        Ok(())
    }

    #[test]
    fn test_invalid_input() {
        for body in [
            json!({ "pages": "", "frames": 3 }),
            json!({ "pages": " , ", "frames": 3 }),
            json!({ "pages": "1 2", "frames": 0 }),
            json!({ "pages": "1 2", "frames": -1 }),
            json!({ "pages": "1 2", "frames": "two" }),
            json!({ "pages": "1 2", "frames": "2.5" }),
            json!({ "pages": "1 2", "frames": 2.5 }),
            json!({ "pages": "1 2", "frames": [2] }),
            json!({ "pages": "1 2", "frames": u64::MAX }),
        ] {
            let err = handle(&request(body)).unwrap_err();
            assert_eq!(
                err,
                Error::InvalidInput("Please enter pages and a valid frame count.".to_string())
            );
            assert_eq!(err.status(), 400);
        }
    }

    #[test]
    fn test_frames_as_string() -> Result<()> {
        let response = handle(&request(json!({ "pages": "1 2 3 1", "frames": " 2 " })))?;

        assert_eq!(response.result.frames_count, 2);
        assert_eq!(response.result.page_faults, 4);
        Ok(())
    }

    #[test]
    fn test_null_frames_is_default() -> Result<()> {
        let response = handle(&request(json!({ "pages": "1", "frames": null })))?;
        assert_eq!(response.result.frames_count, 3);
        Ok(())
    }

    #[test]
    fn test_huge_frame_count() -> Result<()> {
        for frames in [json!(i64::MAX), json!(i64::MAX.to_string())] {
            let response = handle(&request(json!({
                "pages": "1 2 1 3",
                "frames": frames,
                "algorithm": "LRU",
            })))?;

            assert_eq!(response.result.frames_count, i64::MAX as usize);
            assert_eq!(response.result.page_faults, 3);
        }
        Ok(())
    }

    #[test]
    fn test_unknown_algorithm_is_rejected() {
        let err = handle(&request(json!({ "pages": "1 2", "algorithm": "CLOCK" }))).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_segments_keep_request_order() -> Result<()> {
        let response = handle(&request(json!({
            "pages": "1",
            "segments": { "Stack": 1, "Code": "2", "Data": 0 },
        })))?;

        let names: Vec<&str> = response
            .layout
            .memory_map
            .iter()
            .map(|entry| entry.segment.as_str())
            .collect();
        assert_eq!(names, vec!["Stack", "Code", "Code"]);
        Ok(())
    }

    #[test]
    fn test_malformed_segments_keep_simulation() -> Result<()> {
        for segments in [
            json!({ "Code": "two" }),
            json!({ "Code": -1 }),
            json!({ "Code": 1.5 }),
            json!({ "Code": 2, "Data": null }),
        ] {
            let response = handle(&request(json!({
                "pages": "1 2 1",
                "frames": 2,
                "algorithm": "LRU",
                "segments": segments,
            })))?;

            assert_eq!(response.result.page_faults, 2);
            assert!(response.layout.is_empty());
            assert!(response.layout.page_table.is_empty());
            assert!(matches!(
                response.segment_error,
                Some(Error::InvalidSegmentInput(_))
            ));
        }
        Ok(())
    }

    #[test]
    fn test_response_body() -> Result<()> {
        let response = handle(&request(json!({
            "pages": "A,B",
            "frames": 1,
            "algorithm": "Optimal",
            "segments": { "Code": 1 },
        })))?;
        let body: Value = serde_json::from_slice(&response.to_body()?).unwrap();

        assert_eq!(
            body,
            json!({
                "algorithm": "Optimal",
                "framesCount": 1,
                "pageFaults": 2,
                "history": [
                    {
                        "step": 1, "page": "A", "frames": ["A"],
                        "hit": false, "fault": true, "replaced": null,
                    },
                    {
                        "step": 2, "page": "B", "frames": ["B"],
                        "hit": false, "fault": true, "replaced": "A",
                    },
                ],
                "segments": [{"segment": "Code", "page": 0, "address": 0}],
                "pageTable": [{"segment": "Code", "page": 0, "logical": 0, "physical": 0}],
            })
        );
        Ok(())
    }

    #[test]
    fn test_response_body_reports_segment_error() -> Result<()> {
        let response = handle(&request(json!({ "pages": "1", "segments": { "Code": "x" } })))?;
        let body: Value = serde_json::from_slice(&response.to_body()?).unwrap();

        assert_eq!(body["segments"], json!([]));
        assert_eq!(body["pageTable"], json!([]));
        assert!(body["segmentError"].as_str().unwrap().contains("Code"));
        Ok(())
    }

    #[test]
    fn test_error_body() {
        let message = "Please enter pages and a valid frame count.";
        let body = error_body(&Error::InvalidInput(message.to_string()));
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "error": message }));
    }

    #[test]
    fn test_from_json() -> Result<()> {
        let request = SimulationRequest::from_json(br#"{"pages": "1 2", "frames": 2}"#)?;
        assert_eq!(request.frame_count(), Some(2));
        assert_eq!(request.algorithm, None);

        let request = SimulationRequest::from_json(br#"{"pages": "1 2", "frames": "2"}"#)?;
        assert_eq!(request.frame_count(), Some(2));

        assert!(matches!(
            SimulationRequest::from_json(b"{not json"),
            Err(Error::InvalidInput(_))
        ));
        Ok(())
    }
}
