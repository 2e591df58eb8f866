use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub payment: PaymentConfig,
}

/// Payment-provider settings. Only the selected provider's keys are
/// required at startup; the rest may stay unset.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub provider: String,
    pub default_currency: String,
    pub razorpay_key_id: Option<String>,
    pub razorpay_key_secret: Option<String>,
    pub razorpay_webhook_secret: Option<String>,
    pub stripe_secret_key: Option<String>,
    pub stripe_webhook_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            payment: PaymentConfig::from_env(),
        })
    }
}

impl PaymentConfig {
    pub fn from_env() -> Self {
        Self {
            provider: std::env::var("PAYMENT_PROVIDER")
                .unwrap_or_else(|_| "mock".into())
                .to_lowercase(),
            default_currency: std::env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "INR".into()),
            razorpay_key_id: std::env::var("RAZORPAY_KEY_ID").ok(),
            razorpay_key_secret: std::env::var("RAZORPAY_KEY_SECRET").ok(),
            razorpay_webhook_secret: std::env::var("RAZORPAY_WEBHOOK_SECRET").ok(),
            stripe_secret_key: std::env::var("STRIPE_SECRET_KEY").ok(),
            stripe_webhook_secret: std::env::var("STRIPE_WEBHOOK_SECRET").ok(),
        }
    }
}
