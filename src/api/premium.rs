use axum::Json;
use serde_json::{Value, json};

use super::ApiError;
use super::auth::AuthUser;
use super::extract::ValidPath;
use crate::services::{auth_service, currency};

/// GET /premium/features
pub async fn features(AuthUser(user): AuthUser) -> Result<Json<Value>, ApiError> {
    auth_service::require_premium(&user, "Upgrade to premium to access exclusive features")?;

    Ok(Json(json!({
        "message": "Premium Features API",
        "user": user.username,
        "premium": user.premium,
        "features_available": [
            "Currency Converter",
            "Advanced Analytics",
            "Priority Support",
            "Custom Themes",
            "Batch Processing"
        ]
    })))
}

/// GET /premium/currency-convert/{amount}/{from}/{to}
pub async fn currency_convert(
    AuthUser(user): AuthUser,
    ValidPath((amount, from, to)): ValidPath<(f64, String, String)>,
) -> Result<Json<Value>, ApiError> {
    auth_service::require_premium(&user, "Upgrade to premium to access currency conversion")?;

    let conversion = currency::convert(amount, &from, &to)
        .map_err(|_| ApiError::validation("Unsupported currency pair"))?;

    Ok(Json(json!({
        "original_amount": conversion.original_amount,
        "from_currency": conversion.from_currency,
        "to_currency": conversion.to_currency,
        "converted_amount": conversion.converted_amount,
        "exchange_rate": conversion.exchange_rate,
        "user": user.username,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}

/// GET /premium/analytics
pub async fn analytics(AuthUser(user): AuthUser) -> Result<Json<Value>, ApiError> {
    auth_service::require_premium(&user, "Upgrade to premium to access advanced analytics")?;

    Ok(Json(json!({
        "message": format!("Premium analytics for user: {}", user.username),
        "analytics": {
            "usage_trends": [65, 78, 92, 81, 56, 55, 40],
            "top_features": ["Calculator", "Text Tools", "Currency Converter"],
            "time_saved": "15.2 hours",
            "productivity_score": 87,
            "recommendations": [
                "Try batch processing for multiple calculations",
                "Use currency converter for international transactions",
                "Explore advanced text analysis tools"
            ]
        },
        "user": user.username,
    })))
}

/// GET /premium/user/stats
pub async fn user_stats(AuthUser(user): AuthUser) -> Json<Value> {
    Json(json!({
        "username": user.username,
        "premium": user.premium,
        "stats": {
            "calculations_performed": 47,
            "text_operations": 23,
            "premium_features_used": if user.premium { 15 } else { 0 },
            "total_time_saved": "12.5 hours"
        }
    }))
}

/// GET /user/analytics
pub async fn user_analytics(AuthUser(user): AuthUser) -> Json<Value> {
    Json(json!({
        "username": user.username,
        "premium": user.premium,
        "analytics": {
            "calculations_performed": 47,
            "text_operations": 23,
            "time_saved_hours": 12.5,
            "premium_features_used": if user.premium { 15 } else { 0 },
            "favorite_tool": "Advanced Calculator",
            "productivity_score": 88,
            "weekly_usage": [12, 19, 15, 25, 22, 18, 24]
        }
    }))
}

/// GET /user/activity
pub async fn user_activity(AuthUser(user): AuthUser) -> Json<Value> {
    Json(json!({
        "username": user.username,
        "activities": [
            {
                "action": "Dashboard Accessed",
                "description": "Viewed personalized dashboard",
            },
            {
                "action": "Calculation Performed",
                "description": "Used advanced calculator feature",
            },
            {
                "action": "Text Tool Used",
                "description": "Processed text with formatting tools",
            }
        ]
    }))
}
