/// Operational status evaluation.
///
/// Submodules:
/// - `status` — maps season window, fused reading and avalanche bulletin
///   onto Open / Partial / Closed / Unknown.

pub mod status;
