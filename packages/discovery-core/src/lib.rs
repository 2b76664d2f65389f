//! Service discovery core -- domain types, clock abstraction, and the
//! announcement codec shared between the dynamic store and its callers.
//!
//! - **Clock** ([`clock`]): injectable wall-clock source (`Clock`, `SystemClock`, `FrozenClock`)
//! - **Types** ([`types`]): `NodeId`, `ServiceId`, `Service`, `DynamicAnnouncement`, `Services`
//! - **Codec** ([`codec`]): encode/decode a `Service` list to/from its stored text form
//! - **Error** ([`error`]): `CodecError`

pub mod clock;
pub mod codec;
pub mod error;
pub mod types;

pub use clock::{Clock, FrozenClock, SystemClock};
pub use error::CodecError;
pub use types::{
    DynamicAnnouncement, NodeId, Service, ServiceAnnouncementInput, ServiceId, Services,
};
