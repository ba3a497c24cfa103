//! POS 收银 - 现金找零与提交前校验

pub mod cash;

pub use cash::{
    CashTender, compute_change, is_sufficient, tender_cash, tender_cash_str,
    validate_for_submission,
};
