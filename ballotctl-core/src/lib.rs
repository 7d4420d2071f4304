//! ballotctl-core: the "your ballots" view and the session it reads from
//!
//! - [`session`]: injectable session context (address, contract, provider)
//! - [`view`]: `UserBallotsView`, fetch sequencing and published display props
//! - [`display`]: the display collaborator trait
//! - [`provider`]: file-backed and in-memory ballot providers

pub mod ballot;
pub mod config;
pub mod display;
pub mod error;
pub mod provider;
pub mod session;
pub mod view;

pub use ballot::{Address, BallotRecord, ContractHandle};
pub use config::{BallotctlConfig, SessionConfig, ViewConfig};
pub use display::{drive_display, DisplayCampaigns};
pub use error::{BallotError, FetchFailure, Result};
pub use provider::{FileBallotProvider, StaticBallotProvider};
pub use session::{BallotProvider, SessionContext, SessionSnapshot};
pub use view::{DisplayProps, FetchOutcome, MountedView, UserBallotsView, DEFAULT_TITLE};
