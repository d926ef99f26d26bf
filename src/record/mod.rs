//! The uniform record model and the normalizer that produces it.
//!
//! Whatever backend answered, callers see [`Record`] values whose `data`
//! shape is fixed by the record type:
//!
//! | Type | Data |
//! |------|------|
//! | MX | [`RecordData::Mx`] |
//! | SOA | [`RecordData::Soa`] |
//! | CAA | [`RecordData::Caa`] |
//! | NAPTR | [`RecordData::Naptr`] |
//! | SRV | [`RecordData::Srv`] |
//! | TXT | [`RecordData::List`] when quoted, else [`RecordData::Text`] |
//! | everything else | [`RecordData::Text`] |

mod normalize;
mod types;

pub use normalize::{normalize, RawData};
pub use types::{
    CaaData, MxData, NaptrData, ParseRecordTypeError, Record, RecordData, RecordKind, RecordType,
    SoaData, SrvData,
};

pub(crate) use types::strip_root;
