//! Core library for caddie: aggregates a player's golf data from the remote
//! service, flags shots whose measured distance is implausible for the club
//! that recorded them, and coordinates long-running scans so a short-lived
//! consumer can observe and abort them safely.

pub mod classify;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod inventory;
pub mod overrides;
pub mod reference;
pub mod scan;

pub use credentials::{Credential, CredentialStore};
pub use error::{CaddieError, Result};
pub use gateway::{ConnectGateway, GatewayConfig, GolfApi};
pub use overrides::OverrideStore;
pub use reference::ClubDirectory;
pub use scan::{
    ProgressReporter, ScanCoordinator, ScanService, ScanServiceHandle, StartAck,
};
