pub mod narrative_api;
