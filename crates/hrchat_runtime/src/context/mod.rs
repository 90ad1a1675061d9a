//! Everything that shapes what the model sees and what comes back from it:
//! prompt assembly, SQL clean-up and the fixed SQL templates.

pub mod prompt;
pub mod sql;
pub mod templates;
