use sn_core::{Error, PeriodLabel, Prompt, Quote, Result};

/// Token standing in for the company identity inside prompts and replies.
pub const PLACEHOLDER: &str = "XYZ";

/// Change percent beyond which the article should read as big news.
const SHARP_MOVE: f64 = 20.0;

const ENGAGING_OPENER: &str = "Write an engaging informative article in 100 words about the stock";
const PLAIN_OPENER: &str = "Write an informative article in 100 words about the stock";

pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Rounds to three places and always keeps a fractional digit (`9.5`, `10.0`).
pub fn format_decimal(value: f64) -> String {
    let rounded = round3(value);
    // avoid printing "-0.0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    if rounded.is_finite() && rounded.fract() == 0.0 {
        format!("{:.1}", rounded)
    } else {
        format!("{}", rounded)
    }
}

#[derive(Debug, Clone, Copy)]
enum Tone {
    Excited,
    Announcement,
    MajorFall,
    MassiveRise,
}

impl Tone {
    fn instruction(self) -> &'static str {
        match self {
            Tone::Excited => " Article should sound like exciting announcement.",
            Tone::Announcement => " Article should sound like announcement.",
            Tone::MajorFall => " Article should sound like announcement for major stock fall.",
            Tone::MassiveRise => " Article should sound like announcement for massive price rise.",
        }
    }
}

/// Turns a quote and period into the instruction sent to the model.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    placeholder: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self { placeholder: PLACEHOLDER.to_string() }
    }
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Returns `Ok(None)` when the market is closed: there is nothing to write.
    pub fn build(&self, quote: &Quote, period: PeriodLabel) -> Result<Option<Prompt>> {
        let text = match period {
            PeriodLabel::MidDay => self.mid_day(quote),
            PeriodLabel::PreMarket => self.pre_market(quote)?,
            PeriodLabel::PostMarket => self.post_market(quote),
            PeriodLabel::MarketClosed => {
                tracing::debug!("Market closed, no prompt for {}", quote.symbol);
                return Ok(None);
            }
        };
        tracing::debug!("Built {} prompt for {}", period, quote.symbol);
        Ok(Some(Prompt::new(text)))
    }

    /// Same as [`PromptBuilder::build`] for a label that still has to be parsed.
    pub fn build_for(&self, quote: &Quote, period: &str) -> Result<Option<Prompt>> {
        self.build(quote, period.parse()?)
    }

    fn opened_phrase(open: f64) -> String {
        if open == 0.0 {
            String::new()
        } else {
            format!(" that opened today at ${}", format_decimal(open))
        }
    }

    fn mid_day(&self, quote: &Quote) -> String {
        let change_percent = round3(quote.change_percent);
        let mut prompt = format!(
            "{} {}{}, currently trading at ${}, previous session close price was ${}, current volume is {}",
            ENGAGING_OPENER,
            self.placeholder,
            Self::opened_phrase(round3(quote.open)),
            format_decimal(quote.price),
            format_decimal(quote.prev_close),
            quote.volume,
        );
        if change_percent > 0.0 {
            prompt.push_str(&format!(
                ", and change percent from market open till now is {}",
                format_decimal(change_percent)
            ));
        }
        prompt.push('.');
        prompt
    }

    fn pre_market(&self, quote: &Quote) -> Result<String> {
        let prev_close = round3(quote.prev_close);
        if prev_close == 0.0 {
            return Err(Error::ArithmeticHazard(format!(
                "previous close of {} is zero, pre-market change percent is undefined",
                quote.symbol
            )));
        }
        let after_hours = round3(quote.after_hours_price);
        if after_hours == 0.0 {
            tracing::warn!("No after-hours price for {}, treating it as 0", quote.symbol);
        }

        let change_percent = (after_hours / prev_close - 1.0) * 100.0;
        let trend = if change_percent > 0.0 { "bullish" } else { "bearish" };

        let mut prompt = format!(
            "{} {} that opened at {} price ${}, previous session close price was ${}, current volume is {}, and change percent from market open till now is {}.",
            ENGAGING_OPENER,
            self.placeholder,
            trend,
            format_decimal(after_hours),
            format_decimal(prev_close),
            quote.volume,
            format_decimal(change_percent),
        );

        let tone = if change_percent > SHARP_MOVE {
            Some(Tone::Excited)
        } else if change_percent > 0.0 {
            Some(Tone::Announcement)
        } else if change_percent < -SHARP_MOVE {
            Some(Tone::MajorFall)
        } else {
            None
        };
        if let Some(tone) = tone {
            prompt.push_str(tone.instruction());
        }
        Ok(prompt)
    }

    fn post_market(&self, quote: &Quote) -> String {
        let open = round3(quote.open);
        let price = round3(quote.price);
        let mut change_percent = round3(quote.change_percent);

        // the feed reports 0 when it has no figure; derive one from the open
        if change_percent == 0.0 && open != 0.0 {
            change_percent = (price / open - 1.0) * 100.0;
            tracing::warn!(
                "No change percent for {}, derived {} from price and open",
                quote.symbol,
                format_decimal(change_percent)
            );
        }

        let movement = if change_percent > 0.0 {
            "showed bullish movement"
        } else if change_percent < 0.0 {
            "showed bearish movement"
        } else {
            "showed neutral movement"
        };

        let mut prompt = format!(
            "{} {}{}, which {} and closed at price ${}, current volume is {}",
            PLAIN_OPENER,
            self.placeholder,
            Self::opened_phrase(open),
            movement,
            format_decimal(price),
            quote.volume,
        );
        if round3(change_percent) != 0.0 {
            prompt.push_str(&format!(
                ", and change in percent from market open till now is {}",
                format_decimal(change_percent)
            ));
        }
        prompt.push('.');

        if change_percent < -SHARP_MOVE {
            prompt.push_str(Tone::MajorFall.instruction());
        } else if change_percent > SHARP_MOVE {
            prompt.push_str(Tone::MassiveRise.instruction());
        }
        prompt
    }
}
