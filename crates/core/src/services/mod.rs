pub mod aggregation_service;
pub mod balance_service;
pub mod budget_service;
pub mod flow_graph_service;
pub mod flow_service;
pub mod recurring_service;
