// Chat request routing: validate → select backend → (moderate → profile → payload) | agent
// → normalize. Upstream calls go through llm_client and agent only.

pub mod backend;
pub mod handlers;
pub mod normalize;
pub mod payload;
pub mod profile;
pub mod request;
pub mod service;
