//! Marker types.

/// Marker type describing a deadline of something being due.
#[derive(Clone, Copy, Debug)]
pub struct Due;

/// Marker type describing a recurring cycle reference.
#[derive(Clone, Copy, Debug)]
pub struct Cycle;

/// Marker type describing a payment.
#[derive(Clone, Copy, Debug)]
pub struct Payment;

/// Marker type describing an expiration.
#[derive(Clone, Copy, Debug)]
pub struct Expiration;
