use serde_json::{json, Value};

use crate::error::{GatewayError, Result};
use crate::models::AnalysisTask;

/// The forced tool call for one analysis mode: function name, description,
/// JSON-schema parameters, and the fields the gateway checks before
/// forwarding the model's answer to the client.
pub struct ToolSchema {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
    pub required: &'static [&'static str],
}

pub const IMAGE_REQUIRED: &[&str] = &[
    "calories",
    "protein",
    "carbs",
    "fat",
    "servingSize",
    "foodType",
    "tips",
];

pub const SEARCH_REQUIRED: &[&str] = &[
    "name",
    "description",
    "calories",
    "protein",
    "carbs",
    "fat",
    "defaultPortion",
    "nutritionScore",
];

pub const BUILD_REQUIRED: &[&str] = &[
    "items",
    "totalCalories",
    "totalProtein",
    "totalCarbs",
    "totalFat",
    "nutritionScore",
    "mealReview",
];

pub const COMPARE_REQUIRED: &[&str] = &["food1", "food2", "winner", "verdict"];

pub fn tool_for(task: &AnalysisTask) -> ToolSchema {
    match task {
        AnalysisTask::ImageAnalysis { .. } => image_tool(),
        AnalysisTask::Search { .. } => search_tool(),
        AnalysisTask::BuildMeal { .. } => build_tool(),
        AnalysisTask::Compare { .. } => compare_tool(),
    }
}

pub fn required_for(task: &AnalysisTask) -> &'static [&'static str] {
    match task {
        AnalysisTask::ImageAnalysis { .. } => IMAGE_REQUIRED,
        AnalysisTask::Search { .. } => SEARCH_REQUIRED,
        AnalysisTask::BuildMeal { .. } => BUILD_REQUIRED,
        AnalysisTask::Compare { .. } => COMPARE_REQUIRED,
    }
}

/// Presence check only. Value types and nested shapes are constrained by the
/// schema sent upstream; the gateway does not re-validate them.
pub fn validate_required(payload: &Value, required: &[&str]) -> Result<()> {
    let object = payload.as_object().ok_or_else(|| {
        log::error!("❌ Tool-call arguments are not a JSON object: {}", payload);
        GatewayError::MalformedUpstreamResponse
    })?;

    for field in required {
        if !object.contains_key(*field) {
            log::error!("❌ Tool-call arguments missing required field '{}'", field);
            return Err(GatewayError::MalformedUpstreamResponse);
        }
    }

    Ok(())
}

pub fn image_tool() -> ToolSchema {
    ToolSchema {
        name: "provide_nutrition_data",
        description: "Provide detailed nutrition analysis for the meal in the image",
        parameters: json!({
            "type": "object",
            "properties": {
                "calories": { "type": "number", "description": "Total calories in kcal" },
                "protein": { "type": "number", "description": "Protein in grams" },
                "carbs": { "type": "number", "description": "Carbohydrates in grams" },
                "fat": { "type": "number", "description": "Fat in grams" },
                "fiber": { "type": "number", "description": "Fiber in grams" },
                "sugar": { "type": "number", "description": "Sugar in grams" },
                "sodium": { "type": "number", "description": "Sodium in milligrams" },
                "servingSize": {
                    "type": "string",
                    "description": "Estimated serving size (e.g., '1 plate (300g)')"
                },
                "foodType": {
                    "type": "string",
                    "description": "Brief description of the meal (e.g., 'Grilled Chicken Salad')"
                },
                "detectedItems": {
                    "type": "array",
                    "description": "Each distinct dish or item visible in the image",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "portion": {
                                "type": "string",
                                "description": "Visible portion (e.g., '2 rotis', '1 katori')"
                            },
                            "calories": { "type": "number" },
                            "ingredients": {
                                "type": "string",
                                "description": "Main ingredients, comma separated"
                            }
                        },
                        "required": ["name", "portion", "calories"]
                    }
                },
                "nutritionScore": {
                    "type": "string",
                    "description": "Letter grade for overall nutrition quality (e.g., 'A', 'B+', 'C')"
                },
                "warnings": {
                    "type": "array",
                    "description": "Health warnings that apply to this meal",
                    "items": {
                        "type": "object",
                        "properties": {
                            "type": {
                                "type": "string",
                                "enum": [
                                    "high-oil",
                                    "high-sugar",
                                    "deep-fried",
                                    "high-sodium",
                                    "high-ghee",
                                    "processed"
                                ]
                            },
                            "message": { "type": "string" }
                        },
                        "required": ["type", "message"]
                    }
                },
                "recommendations": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Suggestions to make this meal healthier"
                },
                "vitamins": {
                    "type": "object",
                    "description": "Micronutrients as percent of daily value",
                    "properties": {
                        "vitaminA": { "type": "number" },
                        "vitaminC": { "type": "number" },
                        "vitaminD": { "type": "number" },
                        "vitaminB12": { "type": "number" },
                        "iron": { "type": "number" },
                        "calcium": { "type": "number" }
                    }
                },
                "tips": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "3-5 nutrition insights or health tips about this meal"
                }
            },
            "required": IMAGE_REQUIRED,
            "additionalProperties": false
        }),
        required: IMAGE_REQUIRED,
    }
}

pub fn search_tool() -> ToolSchema {
    ToolSchema {
        name: "provide_food_data",
        description: "Provide detailed nutrition data for the searched food",
        parameters: json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "description": "Canonical name of the food" },
                "description": { "type": "string", "description": "One or two sentences about the dish" },
                "calories": { "type": "number", "description": "Calories in kcal for the default portion" },
                "protein": { "type": "number", "description": "Protein in grams" },
                "carbs": { "type": "number", "description": "Carbohydrates in grams" },
                "fat": { "type": "number", "description": "Fat in grams" },
                "fiber": { "type": "number", "description": "Fiber in grams" },
                "sugar": { "type": "number", "description": "Sugar in grams" },
                "sodium": { "type": "number", "description": "Sodium in milligrams" },
                "defaultPortion": {
                    "type": "string",
                    "description": "Typical serving (e.g., '1 katori (150g)', '2 pieces')"
                },
                "portionOptions": {
                    "type": "array",
                    "description": "Alternative portions with multipliers relative to the default",
                    "items": {
                        "type": "object",
                        "properties": {
                            "label": { "type": "string" },
                            "multiplier": { "type": "number" }
                        },
                        "required": ["label", "multiplier"]
                    }
                },
                "ingredients": {
                    "type": "string",
                    "description": "Main ingredients, comma separated"
                },
                "cookingMethod": { "type": "string", "description": "How the dish is usually prepared" },
                "region": { "type": "string", "description": "Region or cuisine the dish comes from" },
                "category": { "type": "string", "description": "Food category (e.g., 'Breakfast', 'Snack', 'Curry')" },
                "nutritionScore": {
                    "type": "string",
                    "description": "Letter grade for overall nutrition quality (e.g., 'A', 'B+', 'C')"
                },
                "warnings": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Health warnings for this food"
                },
                "recommendations": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Healthier ways to enjoy this food"
                },
                "vitamins": {
                    "type": "object",
                    "description": "Micronutrients as percent of daily value",
                    "properties": {
                        "vitaminA": { "type": "number" },
                        "vitaminC": { "type": "number" },
                        "iron": { "type": "number" },
                        "calcium": { "type": "number" }
                    }
                },
                "relatedFoods": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Similar dishes worth comparing"
                }
            },
            "required": SEARCH_REQUIRED,
            "additionalProperties": false
        }),
        required: SEARCH_REQUIRED,
    }
}

pub fn build_tool() -> ToolSchema {
    ToolSchema {
        name: "provide_meal_data",
        description: "Provide combined nutrition data for the described meal",
        parameters: json!({
            "type": "object",
            "properties": {
                "items": {
                    "type": "array",
                    "description": "Per-item breakdown, one entry per described item in order",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "portion": { "type": "string" },
                            "calories": { "type": "number" },
                            "protein": { "type": "number" },
                            "carbs": { "type": "number" },
                            "fat": { "type": "number" }
                        },
                        "required": ["name", "portion", "calories", "protein", "carbs", "fat"]
                    }
                },
                "totalCalories": { "type": "number", "description": "Total calories in kcal" },
                "totalProtein": { "type": "number", "description": "Total protein in grams" },
                "totalCarbs": { "type": "number", "description": "Total carbohydrates in grams" },
                "totalFat": { "type": "number", "description": "Total fat in grams" },
                "totalFiber": { "type": "number", "description": "Total fiber in grams" },
                "nutritionScore": {
                    "type": "string",
                    "description": "Letter grade for the whole meal (e.g., 'A', 'B+', 'C')"
                },
                "warnings": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Health warnings for this meal"
                },
                "recommendations": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Suggestions to balance the meal"
                },
                "mealReview": {
                    "type": "string",
                    "description": "2-3 sentence review of the meal as a whole"
                },
                "vitamins": {
                    "type": "object",
                    "description": "Micronutrients as percent of daily value",
                    "properties": {
                        "vitaminA": { "type": "number" },
                        "vitaminC": { "type": "number" },
                        "iron": { "type": "number" },
                        "calcium": { "type": "number" }
                    }
                }
            },
            "required": BUILD_REQUIRED,
            "additionalProperties": false
        }),
        required: BUILD_REQUIRED,
    }
}

pub fn compare_tool() -> ToolSchema {
    let food_schema = json!({
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "portion": { "type": "string", "description": "Portion both foods are compared at" },
            "calories": { "type": "number", "description": "Calories in kcal" },
            "protein": { "type": "number", "description": "Protein in grams" },
            "carbs": { "type": "number", "description": "Carbohydrates in grams" },
            "fat": { "type": "number", "description": "Fat in grams" },
            "fiber": { "type": "number", "description": "Fiber in grams" },
            "nutritionScore": {
                "type": "string",
                "description": "Letter grade for overall nutrition quality (e.g., 'A', 'B+', 'C')"
            },
            "pros": { "type": "array", "items": { "type": "string" } },
            "cons": { "type": "array", "items": { "type": "string" } }
        },
        "required": ["name", "portion", "calories", "protein", "carbs", "fat", "nutritionScore"]
    });

    ToolSchema {
        name: "provide_comparison_data",
        description: "Provide a nutritional comparison of the two foods",
        parameters: json!({
            "type": "object",
            "properties": {
                "food1": food_schema,
                "food2": food_schema,
                "winner": {
                    "type": "string",
                    "description": "Name of the nutritionally better food"
                },
                "verdict": {
                    "type": "string",
                    "description": "2-3 sentence explanation of the verdict"
                },
                "recommendations": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "When to pick each food"
                }
            },
            "required": COMPARE_REQUIRED,
            "additionalProperties": false
        }),
        required: COMPARE_REQUIRED,
    }
}
