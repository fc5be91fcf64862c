//! HAL response envelope.
//!
//! Every endpoint answers `{"_links": ..., "_embedded": {state, stateDetail,
//! response}}`. `state` is `OK` or `NG`; NG responses carry a detail string
//! and an empty response object.

use serde::Serialize;
use serde_json::{json, Value};

pub const STATE_OK: &str = "OK";
pub const STATE_NG: &str = "NG";

#[derive(Serialize, Debug)]
pub struct Hal {
    #[serde(rename = "_links")]
    links: Value,
    #[serde(rename = "_embedded")]
    embedded: Embedded,
}

#[derive(Serialize, Debug)]
pub struct Embedded {
    state: &'static str,
    #[serde(rename = "stateDetail")]
    state_detail: Value,
    response: Value,
}

impl Hal {
    /// Successful envelope around `response`.
    #[must_use]
    pub fn ok(self_href: &str, response: Value) -> Self {
        Self {
            links: json!({ "self": { "href": self_href } }),
            embedded: Embedded {
                state: STATE_OK,
                state_detail: json!(""),
                response,
            },
        }
    }

    /// Failure envelope with a detail message and empty response.
    #[must_use]
    pub fn ng(self_href: &str, detail: &str) -> Self {
        Self {
            links: json!({ "self": { "href": self_href } }),
            embedded: Embedded {
                state: STATE_NG,
                state_detail: json!(detail),
                response: json!({}),
            },
        }
    }
}
