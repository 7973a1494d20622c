// SPDX-License-Identifier: Apache-2.0

use crate::errors::ApiErrorCode;
use crate::error_mapping::API_ERROR_SCHEMA_REF;
use serde_json::{json, Map, Value};

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {"application/json": {"schema": {"$ref": API_ERROR_SCHEMA_REF}}}
    })
}

fn ok_response(description: &str, schema: &str) -> Value {
    json!({
        "description": description,
        "content": {"application/json": {"schema": {"$ref": format!("#/components/schemas/{schema}")}}}
    })
}

fn body(schema: &str) -> Value {
    json!({
        "required": true,
        "content": {"application/json": {"schema": {"$ref": format!("#/components/schemas/{schema}")}}}
    })
}

fn authed(mut op: Value) -> Value {
    if let Some(obj) = op.as_object_mut() {
        obj.insert("security".to_string(), json!([{"bearerAuth": []}]));
        if let Some(responses) = obj.get_mut("responses").and_then(Value::as_object_mut) {
            responses.insert("401".to_string(), error_response("missing or invalid session"));
        }
    }
    op
}

fn week_query() -> Value {
    json!({"name": "weekOf", "in": "query", "required": true, "schema": {"type": "string", "format": "date"}})
}

fn paths() -> Value {
    let mut paths = Map::new();
    paths.insert(
        "/healthz".to_string(),
        json!({"get": {"responses": {"200": {"description": "ok"}}}}),
    );
    paths.insert(
        "/readyz".to_string(),
        json!({"get": {"responses": {"200": {"description": "ready"}, "503": {"description": "database unavailable"}}}}),
    );
    paths.insert(
        "/v1/version".to_string(),
        json!({"get": {"responses": {"200": {"description": "build identity"}}}}),
    );
    paths.insert(
        "/v1/openapi.json".to_string(),
        json!({"get": {"responses": {"200": {"description": "this document"}}}}),
    );
    paths.insert(
        "/v1/auth/register".to_string(),
        json!({"post": {
            "requestBody": body("RegisterRequest"),
            "responses": {
                "200": ok_response("new session", "Session"),
                "400": error_response("invalid input or email already registered")
            }
        }}),
    );
    paths.insert(
        "/v1/auth/login".to_string(),
        json!({"post": {
            "requestBody": body("LoginRequest"),
            "responses": {
                "200": ok_response("new session", "Session"),
                "400": error_response("invalid input"),
                "401": error_response("invalid email or password")
            }
        }}),
    );
    paths.insert(
        "/v1/auth/me".to_string(),
        json!({"get": authed(json!({"responses": {"200": ok_response("current user", "User")}}))}),
    );
    paths.insert(
        "/v1/recipes".to_string(),
        json!({
            "get": {
                "parameters": [
                    {"name": "search", "in": "query", "schema": {"type": "string"}},
                    {"name": "tags", "in": "query", "schema": {"type": "string", "description": "comma-separated; the first tag filters"}}
                ],
                "responses": {
                    "200": {"description": "recipes, newest first", "content": {"application/json": {"schema": {"type": "array", "items": {"$ref": "#/components/schemas/Recipe"}}}}},
                    "400": error_response("invalid query")
                }
            },
            "post": authed(json!({
                "requestBody": body("CreateRecipeRequest"),
                "responses": {
                    "200": ok_response("created recipe", "Recipe"),
                    "400": error_response("validation failed")
                }
            }))
        }),
    );
    paths.insert(
        "/v1/recipes/{id}".to_string(),
        json!({
            "parameters": [{"name": "id", "in": "path", "required": true, "schema": {"type": "string"}}],
            "get": {
                "responses": {
                    "200": ok_response("recipe detail; isLiked present with a session", "Recipe"),
                    "404": error_response("recipe not found")
                }
            },
            "delete": authed(json!({
                "responses": {
                    "200": ok_response("deleted", "Success"),
                    "403": error_response("not the author"),
                    "404": error_response("recipe not found")
                }
            }))
        }),
    );
    paths.insert(
        "/v1/follow".to_string(),
        json!({
            "post": authed(json!({
                "requestBody": body("FollowRequest"),
                "responses": {
                    "200": ok_response("follow edge", "Follow"),
                    "400": error_response("self-follow or already following"),
                    "404": error_response("user not found")
                }
            })),
            "delete": authed(json!({
                "parameters": [{"name": "userId", "in": "query", "required": true, "schema": {"type": "string"}}],
                "responses": {
                    "200": ok_response("unfollowed", "Success"),
                    "400": error_response("userId missing"),
                    "404": error_response("not following")
                }
            }))
        }),
    );
    paths.insert(
        "/v1/likes".to_string(),
        json!({"post": authed(json!({
            "requestBody": body("LikeRequest"),
            "responses": {
                "200": ok_response("like state after toggling", "LikeResult"),
                "404": error_response("recipe not found")
            }
        }))}),
    );
    paths.insert(
        "/v1/mealplan".to_string(),
        json!({
            "get": authed(json!({
                "parameters": [week_query()],
                "responses": {
                    "200": ok_response("plan for the week, created if absent", "MealPlan"),
                    "400": error_response("weekOf missing or invalid")
                }
            })),
            "post": authed(json!({
                "requestBody": body("AddMealPlanItemRequest"),
                "responses": {
                    "200": ok_response("added item with recipe", "MealPlanItem"),
                    "400": error_response("validation failed"),
                    "404": error_response("recipe not found")
                }
            }))
        }),
    );
    paths.insert(
        "/v1/mealplan/items/{id}".to_string(),
        json!({
            "parameters": [{"name": "id", "in": "path", "required": true, "schema": {"type": "string"}}],
            "delete": authed(json!({
                "responses": {
                    "200": ok_response("removed", "Success"),
                    "403": error_response("item belongs to another user's plan"),
                    "404": error_response("item not found")
                }
            }))
        }),
    );
    paths.insert(
        "/v1/grocery".to_string(),
        json!({"post": authed(json!({
            "requestBody": body("GroceryRequest"),
            "responses": {
                "200": ok_response("aggregated grocery list", "GroceryList"),
                "400": error_response("weekOf invalid")
            }
        }))}),
    );
    paths.insert(
        "/v1/feed".to_string(),
        json!({"get": authed(json!({
            "responses": {
                "200": {"description": "merged activity, newest first", "content": {"application/json": {"schema": {"type": "array", "items": {"$ref": "#/components/schemas/FeedItem"}}}}}
            }
        }))}),
    );
    Value::Object(paths)
}

fn schemas() -> Value {
    let codes: Vec<&str> = ApiErrorCode::ALL.iter().map(|c| c.as_str()).collect();
    json!({
        "ApiErrorCode": {"type": "string", "enum": codes},
        "ApiError": {
            "type": "object",
            "required": ["code", "message", "details", "request_id"],
            "additionalProperties": false,
            "properties": {
                "code": {"$ref": "#/components/schemas/ApiErrorCode"},
                "message": {"type": "string"},
                "details": {"type": "object"},
                "request_id": {"type": "string"}
            }
        },
        "UserSummary": {
            "type": "object",
            "required": ["id"],
            "properties": {
                "id": {"type": "string"},
                "name": {"type": "string", "nullable": true},
                "image": {"type": "string", "nullable": true}
            }
        },
        "User": {
            "type": "object",
            "required": ["id", "email", "createdAt"],
            "properties": {
                "id": {"type": "string"},
                "name": {"type": "string", "nullable": true},
                "email": {"type": "string"},
                "image": {"type": "string", "nullable": true},
                "createdAt": {"type": "string", "format": "date-time"}
            }
        },
        "Session": {
            "type": "object",
            "required": ["token", "tokenType", "expiresAt", "user"],
            "properties": {
                "token": {"type": "string"},
                "tokenType": {"type": "string", "enum": ["Bearer"]},
                "expiresAt": {"type": "string", "format": "date-time"},
                "user": {"$ref": "#/components/schemas/User"}
            }
        },
        "Ingredient": {
            "type": "object",
            "required": ["id", "recipeId", "name", "qty", "unit", "approxPrice"],
            "properties": {
                "id": {"type": "string"},
                "recipeId": {"type": "string"},
                "name": {"type": "string"},
                "qty": {"type": "number"},
                "unit": {"type": "string"},
                "approxPrice": {"type": "number"}
            }
        },
        "Recipe": {
            "type": "object",
            "required": ["id", "title", "cookTimeMin", "servings", "estCostTotal", "tags", "steps", "authorId", "author", "ingredients", "_count"],
            "properties": {
                "id": {"type": "string"},
                "title": {"type": "string"},
                "heroImage": {"type": "string", "nullable": true},
                "cookTimeMin": {"type": "integer", "minimum": 1},
                "servings": {"type": "integer", "minimum": 1},
                "estCostTotal": {"type": "number"},
                "tags": {"type": "array", "items": {"type": "string"}},
                "steps": {"type": "array", "items": {"type": "string"}},
                "authorId": {"type": "string"},
                "createdAt": {"type": "string", "format": "date-time"},
                "updatedAt": {"type": "string", "format": "date-time"},
                "author": {"$ref": "#/components/schemas/UserSummary"},
                "ingredients": {"type": "array", "items": {"$ref": "#/components/schemas/Ingredient"}},
                "_count": {"type": "object", "properties": {"likes": {"type": "integer"}}},
                "isLiked": {"type": "boolean"}
            }
        },
        "MealType": {"type": "string", "enum": ["Breakfast", "Lunch", "Dinner"]},
        "MealPlanItem": {
            "type": "object",
            "required": ["id", "mealPlanId", "recipeId", "dayIndex", "mealType", "servings", "recipe"],
            "properties": {
                "id": {"type": "string"},
                "mealPlanId": {"type": "string"},
                "recipeId": {"type": "string"},
                "dayIndex": {"type": "integer", "minimum": 0, "maximum": 6},
                "mealType": {"$ref": "#/components/schemas/MealType"},
                "servings": {"type": "integer", "minimum": 1},
                "createdAt": {"type": "string", "format": "date-time"},
                "recipe": {"$ref": "#/components/schemas/Recipe"}
            }
        },
        "MealPlan": {
            "type": "object",
            "required": ["id", "userId", "weekOf", "items"],
            "properties": {
                "id": {"type": "string"},
                "userId": {"type": "string"},
                "weekOf": {"type": "string", "format": "date"},
                "createdAt": {"type": "string", "format": "date-time"},
                "items": {"type": "array", "items": {"$ref": "#/components/schemas/MealPlanItem"}}
            }
        },
        "Follow": {
            "type": "object",
            "required": ["fromId", "toId", "to"],
            "properties": {
                "fromId": {"type": "string"},
                "toId": {"type": "string"},
                "createdAt": {"type": "string", "format": "date-time"},
                "to": {"$ref": "#/components/schemas/UserSummary"}
            }
        },
        "GroceryItem": {
            "type": "object",
            "required": ["name", "unit", "qty", "approxPrice", "category"],
            "properties": {
                "name": {"type": "string"},
                "unit": {"type": "string"},
                "qty": {"type": "number"},
                "approxPrice": {"type": "number"},
                "category": {"type": "string", "enum": ["protein", "produce", "dairy", "grains", "pantry"]}
            }
        },
        "GroceryList": {
            "type": "object",
            "required": ["items", "totalCost", "categorizedItems"],
            "properties": {
                "items": {"type": "array", "items": {"$ref": "#/components/schemas/GroceryItem"}},
                "totalCost": {"type": "number"},
                "categorizedItems": {"type": "object", "additionalProperties": {"type": "array", "items": {"$ref": "#/components/schemas/GroceryItem"}}}
            }
        },
        "FeedItem": {
            "type": "object",
            "required": ["id", "type", "user", "recipe", "createdAt"],
            "properties": {
                "id": {"type": "string"},
                "type": {"type": "string", "enum": ["recipe_created", "recipe_added_to_week"]},
                "user": {"$ref": "#/components/schemas/UserSummary"},
                "recipe": {"$ref": "#/components/schemas/Recipe"},
                "mealType": {"$ref": "#/components/schemas/MealType"},
                "dayIndex": {"type": "integer"},
                "createdAt": {"type": "string", "format": "date-time"}
            }
        },
        "RegisterRequest": {
            "type": "object",
            "required": ["name", "email", "password"],
            "properties": {
                "name": {"type": "string", "minLength": 1},
                "email": {"type": "string", "format": "email"},
                "password": {"type": "string", "minLength": 8}
            }
        },
        "LoginRequest": {
            "type": "object",
            "required": ["email", "password"],
            "properties": {"email": {"type": "string"}, "password": {"type": "string"}}
        },
        "CreateRecipeRequest": {
            "type": "object",
            "required": ["title", "cookTimeMin", "servings", "tags", "steps", "ingredients"],
            "properties": {
                "title": {"type": "string", "minLength": 1},
                "heroImage": {"type": "string", "format": "uri"},
                "cookTimeMin": {"type": "integer", "minimum": 1},
                "servings": {"type": "integer", "minimum": 1},
                "tags": {"type": "array", "items": {"type": "string"}},
                "steps": {"type": "array", "items": {"type": "string", "minLength": 1}},
                "ingredients": {"type": "array", "items": {
                    "type": "object",
                    "required": ["name", "qty", "unit", "approxPrice"],
                    "properties": {
                        "name": {"type": "string", "minLength": 1},
                        "qty": {"type": "number", "minimum": 0},
                        "unit": {"type": "string", "minLength": 1},
                        "approxPrice": {"type": "number", "minimum": 0}
                    }
                }}
            }
        },
        "AddMealPlanItemRequest": {
            "type": "object",
            "required": ["recipeId", "dayIndex", "mealType", "weekOf"],
            "properties": {
                "recipeId": {"type": "string"},
                "dayIndex": {"type": "integer", "minimum": 0, "maximum": 6},
                "mealType": {"$ref": "#/components/schemas/MealType"},
                "servings": {"type": "integer", "minimum": 1, "default": 1},
                "weekOf": {"type": "string"}
            }
        },
        "FollowRequest": {"type": "object", "required": ["userId"], "properties": {"userId": {"type": "string"}}},
        "LikeRequest": {"type": "object", "required": ["recipeId"], "properties": {"recipeId": {"type": "string"}}},
        "LikeResult": {"type": "object", "required": ["liked"], "properties": {"liked": {"type": "boolean"}}},
        "GroceryRequest": {"type": "object", "required": ["weekOf"], "properties": {"weekOf": {"type": "string"}}},
        "Success": {"type": "object", "required": ["success"], "properties": {"success": {"type": "boolean"}}}
    })
}

#[must_use]
pub fn openapi_v1_spec() -> Value {
    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "DormChef API",
            "version": "v1"
        },
        "paths": paths(),
        "components": {
            "securitySchemes": {
                "bearerAuth": {"type": "http", "scheme": "bearer"}
            },
            "schemas": schemas()
        }
    })
}
