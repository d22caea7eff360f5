pub mod advice;
pub mod budget;
pub mod chat;
pub mod summary;
pub mod transaction;

pub use advice::{mistyped_fields, AdviceProfile, AdviceRequest};
pub use budget::{BudgetPeriod, BudgetRow, NewBudget, BUDGETS_TABLE};
pub use chat::{ChatContext, ChatRequest, ContextTransaction};
pub use summary::{summarize, CategoryTotal, Month, TransactionSummary};
pub use transaction::{missing_fields, REQUIRED_FIELDS, TRANSACTIONS_TABLE};
