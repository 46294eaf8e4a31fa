// Two-tier handler layout: public (token acquisition) and the site routes,
// which declare their auth tier (member or admin) through their extractor.

pub mod public;
pub mod sites;
