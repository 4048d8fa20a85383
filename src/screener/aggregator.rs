use crate::data::{CandleSeries, ImbalanceSummary, Polarity};
use crate::screener::imbalance::detect;
use rust_decimal::Decimal;

/// Pick the most recent untested imbalance of one polarity and express it
/// relative to the asset's last price
///
/// Returns the polarity's sentinel summary when nothing untested remains.
/// Distance is `1 - price / last_price` rounded half-even to 2 decimal
/// places, then negated for seller polarity. `last_price` must be positive;
/// the pipeline checks it before calling.
pub fn nearest_untested(
    series: &CandleSeries,
    polarity: Polarity,
    last_price: Decimal,
) -> ImbalanceSummary {
    let nearest = detect(series, polarity)
        .into_iter()
        .filter(|imbalance| !imbalance.tested)
        .last();

    match nearest {
        None => ImbalanceSummary::missing(polarity),
        Some(imbalance) => {
            let discount = (Decimal::ONE - imbalance.price / last_price).round_dp(2);
            let distance = match polarity {
                Polarity::Buyer => discount,
                Polarity::Seller => -discount,
            };
            ImbalanceSummary::found(imbalance.origin_date, imbalance.price, distance)
        }
    }
}
