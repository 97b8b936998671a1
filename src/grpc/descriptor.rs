//! File descriptor of the `healthz.v1` schema, for server reflection.
//!
//! Mirrors the messages in `proto.rs` field for field. Built in code so the
//! crate still needs no protoc step.

use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, FileDescriptorSet, MethodDescriptorProto, ServiceDescriptorProto,
};

use crate::grpc::proto::ServingStatus;

/// Path of the schema file as reported by reflection.
pub const FILE_NAME: &str = "healthz/v1/health.proto";

const PACKAGE: &str = "healthz.v1";

fn message(name: &str, field: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field,
        ..Default::default()
    }
}

fn field(name: &str, number: i32, kind: Type, type_name: Option<&str>) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        json_name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(kind as i32),
        type_name: type_name.map(|t| format!(".{}.{}", PACKAGE, t)),
        ..Default::default()
    }
}

fn method(name: &str, input: &str, output: &str, server_streaming: bool) -> MethodDescriptorProto {
    MethodDescriptorProto {
        name: Some(name.to_string()),
        input_type: Some(format!(".{}.{}", PACKAGE, input)),
        output_type: Some(format!(".{}.{}", PACKAGE, output)),
        client_streaming: Some(false),
        server_streaming: Some(server_streaming),
        ..Default::default()
    }
}

/// Descriptor of `healthz/v1/health.proto`.
pub fn file_descriptor() -> FileDescriptorProto {
    let statuses = [ServingStatus::Unspecified, ServingStatus::Serving, ServingStatus::NotServing];

    FileDescriptorProto {
        name: Some(FILE_NAME.to_string()),
        package: Some(PACKAGE.to_string()),
        syntax: Some("proto3".to_string()),
        message_type: vec![
            message("CheckRequest", vec![]),
            message(
                "CheckResponse",
                vec![field("status", 1, Type::Enum, Some("ServingStatus"))],
            ),
            message("PingRequest", vec![]),
            message("PongResponse", vec![field("pong", 1, Type::Bool, None)]),
        ],
        enum_type: vec![EnumDescriptorProto {
            name: Some("ServingStatus".to_string()),
            value: statuses
                .iter()
                .map(|status| EnumValueDescriptorProto {
                    name: Some(status.as_str_name().to_string()),
                    number: Some(*status as i32),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }],
        service: vec![ServiceDescriptorProto {
            name: Some("HealthService".to_string()),
            method: vec![
                method("Check", "CheckRequest", "CheckResponse", false),
                method("Watch", "CheckRequest", "CheckResponse", true),
                method("Ping", "PingRequest", "PongResponse", false),
            ],
            ..Default::default()
        }],
        ..Default::default()
    }
}

pub fn file_descriptor_set() -> FileDescriptorSet {
    FileDescriptorSet {
        file: vec![file_descriptor()],
    }
}
