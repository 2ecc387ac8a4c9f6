// Hacker News — the external community-signal provider.

pub mod client;
