// Section updaters - turn metric results into chart options and KPI tiles
pub mod origin_pull;
pub mod performance;
pub mod security;
pub mod series;
pub mod top;
pub mod traffic;
pub mod world_map;
