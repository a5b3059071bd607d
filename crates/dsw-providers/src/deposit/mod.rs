//! Deposit Backend Adapters
//!
//! Both adapters accept the same [`StandardDepositPayload`] and return
//! responses in one normalized body shape:
//!
//! ```json
//! { "status": "registered", "deposit_reference": "TEN-42", "dan": "DAN0001" }
//! ```
//!
//! so results from the two backends can be compared field by field.
//!
//! [`StandardDepositPayload`]: dsw_domain::value_objects::StandardDepositPayload

pub mod helpers;
pub mod legacy;
pub mod salesforce;

pub use legacy::LegacyDepositAdapter;
pub use salesforce::SalesforceDepositAdapter;
