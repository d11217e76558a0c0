mod client;
mod metering;
mod source;

pub use self::{
    metering::{Api, MessagesRequest, SignupRequest, models},
    source::{Batch, MeterInfo, ReadingSource, SourceKind},
};
