pub mod churn;
pub mod flows;
