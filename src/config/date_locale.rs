use crate::error::{
    BadDateTimeFormatterSnafu, ElevesResult, InvalidLocaleSnafu, InvalidTimezoneSnafu,
    ZoneDateSnafu,
};
use icu::{
    datetime::{
        DateTimeFormatter, DateTimeFormatterPreferences, fieldsets::YMD, options::Alignment,
    },
    locale::Locale,
    time::{TimeZoneInfo, ZonedDateTime, zone::models::AtTime},
};
use jiff::{
    Timestamp, Zoned,
    civil::{Date, DateTime},
    tz::TimeZone,
};
use jiff_icu::ConvertFrom;
use snafu::ResultExt;
use std::fmt;

/// Formats backend dates the way the admin page shows them: short, numeric, in the configured
/// locale.
pub struct DateLocaleConfig {
    pub timezone: TimeZone,
    pub locale: Locale,
    dtf_prefs: DateTimeFormatterPreferences,
}

impl fmt::Debug for DateLocaleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateLocaleConfig")
            .field("timezone", &self.timezone.iana_name().unwrap_or("UTC"))
            .field("locale", &self.locale.to_string())
            .finish_non_exhaustive()
    }
}

impl DateLocaleConfig {
    pub fn new(timezone: String, locale: String) -> ElevesResult<Self> {
        let timezone = TimeZone::get(&timezone).context(InvalidTimezoneSnafu { tz: timezone })?;
        Self::with_timezone(timezone, locale)
    }

    pub fn with_system_timezone(locale: String) -> ElevesResult<Self> {
        Self::with_timezone(TimeZone::system(), locale)
    }

    fn with_timezone(timezone: TimeZone, locale: String) -> ElevesResult<Self> {
        let locale =
            Locale::try_from_str(&locale).context(InvalidLocaleSnafu { provided: locale })?;

        let mut prefs = DateTimeFormatterPreferences::default();
        prefs.locale_preferences = (&locale).into();

        //fail at start-up rather than on the first page load
        Self::short_ymd_formatter(prefs)?;

        Ok(Self {
            timezone,
            locale,
            dtf_prefs: prefs,
        })
    }

    fn short_ymd_formatter(
        prefs: DateTimeFormatterPreferences,
    ) -> ElevesResult<DateTimeFormatter<YMD>> {
        DateTimeFormatter::try_new(prefs, {
            let mut fieldset = YMD::short();
            fieldset.alignment = Some(Alignment::Column);
            fieldset
        })
        .context(BadDateTimeFormatterSnafu)
    }

    /// Builds the formatter for one batch of dates.
    pub fn localiser(&self) -> ElevesResult<DateLocaliser<'_>> {
        Ok(DateLocaliser {
            config: self,
            formatter: Self::short_ymd_formatter(self.dtf_prefs)?,
        })
    }

    /// Instants are shifted into the configured timezone, plain dates keep their day.
    ///
    /// Returns `Ok(None)` if `raw` isn't a date jiff understands.
    fn zone_raw_date(&self, raw: &str) -> ElevesResult<Option<Zoned>> {
        let zoned = if let Ok(timestamp) = raw.parse::<Timestamp>() {
            timestamp.to_zoned(self.timezone.clone())
        } else if let Ok(date) = raw.parse::<Date>() {
            date.to_zoned(self.timezone.clone())
                .context(ZoneDateSnafu { original: raw })?
        } else if let Ok(date_time) = raw.parse::<DateTime>() {
            date_time
                .to_zoned(self.timezone.clone())
                .context(ZoneDateSnafu { original: raw })?
        } else {
            return Ok(None);
        };

        Ok(Some(zoned))
    }
}

/// One built formatter, reused for every date in a list.
pub struct DateLocaliser<'a> {
    config: &'a DateLocaleConfig,
    formatter: DateTimeFormatter<YMD>,
}

impl DateLocaliser<'_> {
    fn short_ymd(&self, zoned: &Zoned) -> String {
        let zdt = ZonedDateTime::<_, TimeZoneInfo<AtTime>>::convert_from(zoned);
        self.formatter.format(&zdt).to_string()
    }

    pub fn localise_raw_date(&self, raw: &str) -> ElevesResult<Option<String>> {
        Ok(self
            .config
            .zone_raw_date(raw)?
            .map(|zoned| self.short_ymd(&zoned)))
    }
}
