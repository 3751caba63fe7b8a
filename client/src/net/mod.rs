//! Remote access: the `Backend` seam, its HTTP implementation, and the live
//! history subscription.

pub mod api;
pub mod backend;
pub mod live;
