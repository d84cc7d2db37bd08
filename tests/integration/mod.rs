mod bundles;
mod concurrency;
mod containers;
mod error_cases;
mod sell_flow;
