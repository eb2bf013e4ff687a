// handlers/mod.rs - HTTP resource handlers
//
// Public:    /autos/ping, /marken/ping, /health
// ADMIN|USER: reads on /autos and /marken, POST /auth/token
// ADMIN:     every mutating call
//
// Role checks are extractor guards (`RequireUser`, `RequireAdmin`) declared in
// each handler signature; the `authenticate` middleware only resolves who the
// caller is.

pub mod autos;
pub mod marken;
pub mod system;
pub mod utils;
