pub mod compliance_metrics;
pub mod hierarchy_graph;
pub mod info_panel;
pub mod location_list;
