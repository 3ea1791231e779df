//! Parameter descriptors published by attacks

use std::fmt;

/// Parameter type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterType {
    /// 32-bit unsigned integer
    U32,
    /// 64-bit unsigned integer
    U64,
    /// Boolean flag
    Bool,
    /// Comma separated `transmitter/receiver/channel` triples
    TargetList,
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParameterType::U32 => "u32",
            ParameterType::U64 => "u64",
            ParameterType::Bool => "bool",
            ParameterType::TargetList => "targets",
        };
        f.pad(name)
    }
}

/// Parameter descriptor
#[derive(Debug, Clone)]
pub struct ParamDescriptor {
    /// Parameter name
    pub name: &'static str,
    /// Parameter description
    pub description: &'static str,
    /// Parameter type
    pub param_type: ParameterType,
    /// Default value
    pub default: Option<&'static str>,
    /// Is this parameter required?
    pub required: bool,
}

impl ParamDescriptor {
    pub const fn new(name: &'static str, param_type: ParameterType) -> Self {
        Self {
            name,
            description: "",
            param_type,
            default: None,
            required: false,
        }
    }

    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub const fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}
