//! Collaborator interfaces: demand forecasting and order pricing.
//!
//! Both are consumed, never driven, by the routing engine. A forecast only
//! fills in the demands of a future instance before it is validated; a price
//! is attached to a [`Stop`] for reporting and is never read by
//! construction, local search or feasibility checks.
//!
//! [`LinearTrend`] and [`Tariff`] are simple stand-ins so the interfaces can
//! be exercised without an external service.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CvrpError;
use crate::models::Stop;

/// Load delivered to one stop on one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadObservation {
    /// Day number on any consistent scale.
    pub day: u32,
    pub load: f64,
}

/// Predicts a stop's load on a future day from its history.
pub trait ForecastProvider {
    fn forecast(&self, history: &[LoadObservation], day: u32) -> f64;
}

/// Least-squares line through the history.
///
/// An empty history forecasts 0; a history on a single day forecasts its
/// mean.
///
/// # Examples
///
/// ```
/// use u_cvrp::providers::{ForecastProvider, LinearTrend, LoadObservation};
///
/// let history = [
///     LoadObservation { day: 1, load: 4.0 },
///     LoadObservation { day: 2, load: 6.0 },
///     LoadObservation { day: 3, load: 8.0 },
/// ];
/// assert!((LinearTrend.forecast(&history, 5) - 12.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearTrend;

impl ForecastProvider for LinearTrend {
    fn forecast(&self, history: &[LoadObservation], day: u32) -> f64 {
        if history.is_empty() {
            return 0.0;
        }
        let n = history.len() as f64;
        let mean_x = history.iter().map(|o| f64::from(o.day)).sum::<f64>() / n;
        let mean_y = history.iter().map(|o| o.load).sum::<f64>() / n;
        let (mut sxy, mut sxx) = (0.0, 0.0);
        for o in history {
            let dx = f64::from(o.day) - mean_x;
            sxy += dx * (o.load - mean_y);
            sxx += dx * dx;
        }
        if sxx == 0.0 {
            return mean_y;
        }
        mean_y + sxy / sxx * (f64::from(day) - mean_x)
    }
}

/// Turns per-stop forecasts into integer demands for `day`.
///
/// `histories[i]` is the history of stop `i`. Forecasts are rounded up and
/// clamped at zero; the depot always gets 0.
pub fn forecast_demands<F>(provider: &F, histories: &[Vec<LoadObservation>], depot: usize, day: u32) -> Vec<i32>
where
    F: ForecastProvider + ?Sized,
{
    histories
        .iter()
        .enumerate()
        .map(|(stop, history)| {
            if stop == depot {
                return 0;
            }
            let expected = provider.forecast(history, day);
            if expected.is_finite() && expected > 0.0 {
                expected.ceil() as i32
            } else {
                0
            }
        })
        .collect()
}

/// How fast an order must be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Standard,
    Express,
}

/// Size class of the truck an order books.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruckClass {
    Mini,
    Medium,
    Heavy,
}

/// Commercial tier of the ordering customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerTier {
    Regular,
    Priority,
    Business,
}

/// What a pricing provider knows about an order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderAttributes {
    pub load: f64,
    pub urgency: Urgency,
    pub truck_class: TruckClass,
    pub customer_tier: CustomerTier,
}

/// Quotes a price for an order.
pub trait PricingProvider {
    fn price(&self, order: &OrderAttributes) -> f64;
}

/// Multiplicative tariff.
///
/// `(base + per_unit * load) * truck`, then +25% for express delivery, +10%
/// for priority customers or -5% for business customers, then the peak
/// multiplier, rounded to cents.
///
/// # Examples
///
/// ```
/// use u_cvrp::providers::{CustomerTier, OrderAttributes, PricingProvider, Tariff, TruckClass, Urgency};
///
/// let order = OrderAttributes {
///     load: 2.0,
///     urgency: Urgency::Standard,
///     truck_class: TruckClass::Mini,
///     customer_tier: CustomerTier::Regular,
/// };
/// assert!((Tariff::default().price(&order) - 7590.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tariff {
    pub base: f64,
    pub per_unit: f64,
    pub peak: f64,
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            base: 5000.0,
            per_unit: 800.0,
            peak: 1.15,
        }
    }
}

impl PricingProvider for Tariff {
    fn price(&self, order: &OrderAttributes) -> f64 {
        let truck = match order.truck_class {
            TruckClass::Mini => 1.0,
            TruckClass::Medium => 1.3,
            TruckClass::Heavy => 1.6,
        };
        let mut price = (self.base + self.per_unit * order.load) * truck;
        if order.urgency == Urgency::Express {
            price *= 1.25;
        }
        price *= match order.customer_tier {
            CustomerTier::Regular => 1.0,
            CustomerTier::Priority => 1.10,
            CustomerTier::Business => 0.95,
        };
        (price * self.peak * 100.0).round() / 100.0
    }
}

/// Quotes every order and stores the price on its stop.
///
/// `orders` pairs a stop identifier with the order placed there.
pub fn attach_prices<P>(provider: &P, stops: &mut [Stop], orders: &[(usize, OrderAttributes)]) -> Result<(), CvrpError>
where
    P: PricingProvider + ?Sized,
{
    for (stop, order) in orders {
        let count = stops.len();
        let target = stops
            .get_mut(*stop)
            .ok_or_else(|| CvrpError::InvalidArgument(format!("order for unknown stop {stop} ({count} stops)")))?;
        let price = provider.price(order);
        debug!(stop, price, "price attached");
        target.set_price(price);
    }
    Ok(())
}
