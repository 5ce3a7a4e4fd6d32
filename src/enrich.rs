use crate::{
    config::Config,
    keywords::KeywordSource,
    level::classify_level,
    pay::pay_figure,
    record::{Field, Record},
};
use unicode_normalization::UnicodeNormalization;

pub const LEVEL_COLUMN: &str = "JobLevel";
pub const PAY_COLUMN: &str = "JobPay";
pub const KEYWORDS_COLUMN: &str = "Keywords";

/// Adds the derived columns to every record of the batch.
pub fn enrich_batch(cfg: &Config, batch: &mut [Record], keywords: &dyn KeywordSource) {
    for record in batch.iter_mut() {
        enrich_record(cfg, record, keywords);
    }
}

/// Derives level, pay and keywords from the raw title and description.
/// Existing derived values are overwritten so enrichment can be rerun.
pub fn enrich_record(cfg: &Config, record: &mut Record, keywords: &dyn KeywordSource) {
    let title = record.text(&cfg.enrichment.title_column).unwrap_or_default();
    let desc = record
        .text(&cfg.postprocess.description_column)
        .unwrap_or_default();
    let desc = if cfg.enrichment.normalize_unicode {
        desc.nfkc().collect::<String>()
    } else {
        desc
    };

    let level = classify_level(&title);
    let pay = pay_figure(&desc);
    let top = keywords.top_keywords(&desc, cfg.enrichment.keywords_top_n);

    record.set(LEVEL_COLUMN, Field::Scalar(level.to_string()));
    record.set(PAY_COLUMN, Field::Scalar(pay));
    record.set(KEYWORDS_COLUMN, Field::Scalar(top.join(", ")));
}
