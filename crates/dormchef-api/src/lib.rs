// SPDX-License-Identifier: Apache-2.0
#![forbid(unsafe_code)]
#![recursion_limit = "256"]

//! HTTP wire contract: error envelope, status mapping, request validation,
//! query parameters and the OpenAPI document.

pub mod dto;
pub mod error_mapping;
mod errors;
mod openapi;
pub mod params;

pub use dto::{
    AddMealPlanItemRequest, CreateRecipeRequest, FieldErrors, FollowRequest, GroceryRequest,
    IngredientInput, LikeRequest, LikeResponse, LoginRequest, RegisterRequest, SessionResponse,
    SuccessResponse, ValidRegistration, VersionResponse,
};
pub use error_mapping::{api_error_status, map_error};
pub use errors::{ApiError, ApiErrorCode, ErrorEnvelope, UNKNOWN_REQUEST_ID};
pub use openapi::openapi_v1_spec;
pub use params::{
    parse_plan_item_path, parse_recipe_list_params, parse_recipe_path, parse_user_id_param,
    parse_week_param,
};

pub const CRATE_NAME: &str = "dormchef-api";
