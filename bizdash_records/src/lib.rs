//! Wire shapes for the documents served by the business-management backend.
//!
//! Sales, payments and expenses arrive as loosely-typed JSON. Nothing here
//! rejects a document for a missing or oddly-typed field; that judgement is
//! left to the normalizer in `bizdash_lib`. An element that is not a document
//! at all is skipped and counted by [`RecordBatch`].

mod errors;
pub mod types;

pub use self::errors::Error;
pub use self::types::{
    RawExpense, RawLineItem, RawPayment, RawRef, RawSale, RecordBatch, RefDoc,
};
