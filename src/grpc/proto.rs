//! Wire messages of `healthz.v1.HealthService`.
//!
//! Written by hand with the prost derives; there is no `.proto` build step.

/// Fully qualified service name.
pub const SERVICE_NAME: &str = "healthz.v1.HealthService";

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct CheckRequest {}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct CheckResponse {
    #[prost(enumeration = "ServingStatus", tag = "1")]
    pub status: i32,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct PingRequest {}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct PongResponse {
    #[prost(bool, tag = "1")]
    pub pong: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ServingStatus {
    Unspecified = 0,
    Serving = 1,
    NotServing = 2,
}

impl ServingStatus {
    /// Name as it appears in the schema (and in the HTTP gateway's JSON).
    pub fn as_str_name(&self) -> &'static str {
        match self {
            ServingStatus::Unspecified => "SERVING_STATUS_UNSPECIFIED",
            ServingStatus::Serving => "SERVING_STATUS_SERVING",
            ServingStatus::NotServing => "SERVING_STATUS_NOT_SERVING",
        }
    }

    pub fn from_str_name(value: &str) -> Option<Self> {
        match value {
            "SERVING_STATUS_UNSPECIFIED" => Some(Self::Unspecified),
            "SERVING_STATUS_SERVING" => Some(Self::Serving),
            "SERVING_STATUS_NOT_SERVING" => Some(Self::NotServing),
            _ => None,
        }
    }
}

impl CheckResponse {
    pub fn serving() -> Self {
        Self {
            status: ServingStatus::Serving as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn status_names_match_schema() {
        for status in [ServingStatus::Unspecified, ServingStatus::Serving, ServingStatus::NotServing] {
            assert_eq!(ServingStatus::from_str_name(status.as_str_name()), Some(status));
        }
        assert_eq!(ServingStatus::from_str_name("SERVING"), None);
    }

    #[test]
    fn serving_response_encodes_status_field() {
        let bytes = CheckResponse::serving().encode_to_vec();
        assert_eq!(bytes, vec![0x08, 0x01]);

        let decoded = CheckResponse::decode(bytes.as_slice()).unwrap();
        assert_eq!(decoded.status(), ServingStatus::Serving);
    }

    #[test]
    fn unknown_status_reads_as_unspecified() {
        let response = CheckResponse { status: 42 };
        assert_eq!(response.status(), ServingStatus::Unspecified);
    }
}
