pub mod analytics_service;
pub mod budget_service;
pub mod goal_service;
pub mod transaction_service;

pub use analytics_service::{AnalyticsService, CategoryTotal, MonthlyTrend, SummaryStats};
pub use budget_service::BudgetService;
pub use goal_service::GoalService;
pub use transaction_service::TransactionService;
