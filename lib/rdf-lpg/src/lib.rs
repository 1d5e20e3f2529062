#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod cache;
pub mod delete;
pub mod error;
pub mod import;
pub mod io;
mod job;
pub mod preview;
pub mod summary;

pub mod model {
    pub use rdf_lpg_model::*;
}

pub mod mapping {
    pub use rdf_lpg_mapping::*;
}

pub mod common {
    pub use rdf_lpg_common::*;
}

pub mod storage {
    pub use rdf_lpg_storage::*;
}
