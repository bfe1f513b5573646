//! Sans-IO translation between Diameter requests and RADIUS exchanges.

pub mod types;
pub mod settings;
pub mod translator;
pub mod decode;
pub mod forward;
pub mod answer;
pub mod policy;

pub use answer::DiameterAnswer;
pub use forward::Forwarding;
pub use policy::{result_code_for, timeout_result_code};
pub use settings::{EutranVector, TranslatorSettings};
pub use translator::MessageTranslator;
pub use types::*;
