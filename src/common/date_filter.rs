use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, SubsecRound, Utc};

use crate::common::error::AppError;

// Intervalo de datas vindo da query string (`startDate` / `endDate`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,  // inclusivo
    pub until: Option<DateTime<Utc>>, // exclusivo
}

impl DateRange {
    /// Aceita RFC 3339 ou `YYYY-MM-DD`. Uma data simples em `end` inclui o dia inteiro.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, AppError> {
        let from = start
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_instant(s, false))
            .transpose()?;
        let until = end
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_instant(s, true))
            .transpose()?;

        Ok(Self { from, until })
    }
}

fn parse_instant(raw: &str, is_end: bool) -> Result<DateTime<Utc>, AppError> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        let dt = dt.with_timezone(&Utc);
        // O Postgres guarda microssegundos: o fim exclusivo é o próximo microssegundo
        return Ok(if is_end { dt.trunc_subsecs(6) + Duration::microseconds(1) } else { dt });
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidDate(raw.to_string()))?;
    let date = if is_end {
        date.checked_add_days(Days::new(1))
            .ok_or_else(|| AppError::InvalidDate(raw.to_string()))?
    } else {
        date
    };

    Ok(date.and_time(NaiveTime::MIN).and_utc())
}
