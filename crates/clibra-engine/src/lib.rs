#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod generate;
mod procedure;
mod remove;
mod request;
mod show;
mod update;

pub use error::{EngineError, Result};
pub use generate::{GenerateReport, generate};
pub use procedure::{parse_generate_procedure, parse_update_procedure, read_procedure_file};
pub use remove::{RemoveReport, remove};
pub use request::{GenerateRequest, RemoveRequest, UpdateOptions, UpdateRequest};
pub use show::{ShowReport, show};
pub use update::{DateOutcome, DateReport, UpdateReport, update, update_with_progress};
