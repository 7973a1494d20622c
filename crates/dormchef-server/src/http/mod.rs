// SPDX-License-Identifier: Apache-2.0

pub(crate) mod auth_endpoints;
pub(crate) mod extract;
pub(crate) mod feed;
pub(crate) mod meal_plans;
pub(crate) mod ops;
pub(crate) mod recipes;
pub(crate) mod request_tracing;
pub(crate) mod response_contract;
pub(crate) mod social;

pub use response_contract::HandlerError;
pub(crate) use response_contract::HandlerResult;
