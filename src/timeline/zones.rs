use std::collections::HashMap;

use crate::interval::Interval;
use crate::landscape::{ZoneConfiguration, ZoneError, ZoneTransition};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Hold {
    start: f64,
    end: f64,
    status: usize,
    status_after: usize,
    /// Transitions admit nobody else, whatever the status.
    exclusive: bool,
}

/// Status history of every zone.
///
/// Works requiring the same status may share a zone. Any other use is
/// serialized behind all conflicting holds, and a status change occupies the
/// zone alone for the configured transition time.
#[derive(Debug, Clone)]
pub struct ZoneTimeline {
    config: ZoneConfiguration,
    holds: HashMap<String, Vec<Hold>>,
}

/// What a zone looks like to a newcomer wanting `status`.
struct Outlook {
    /// Earliest start as far as this zone is concerned.
    ready: f64,
    /// Status the zone is left in by its latest hold.
    last: usize,
    /// End of the latest hold of any status.
    all_end: f64,
    /// Cost of moving from `last` to the wanted status.
    cost: f64,
}

impl ZoneTimeline {
    pub fn new(config: ZoneConfiguration) -> Self {
        Self {
            config,
            holds: HashMap::new(),
        }
    }

    pub fn config(&self) -> &ZoneConfiguration {
        &self.config
    }

    fn outlook(&self, zone: &str, status: usize) -> Result<Outlook, ZoneError> {
        let start_status = self.config.start_status(zone)?;
        let holds = self.holds.get(zone).map_or(&[][..], Vec::as_slice);

        let mut conflicting_end = 0.0_f64;
        let mut all_end = 0.0_f64;
        let mut last = start_status;
        let mut last_end = f64::NEG_INFINITY;
        for hold in holds {
            if hold.exclusive || hold.status != status {
                conflicting_end = conflicting_end.max(hold.end);
            }
            all_end = all_end.max(hold.end);
            // later holds win ties
            if hold.end >= last_end {
                last_end = hold.end;
                last = hold.status_after;
            }
        }

        let cost = self.config.time_cost(zone, last, status)?;
        let ready = if last == status {
            conflicting_end
        } else {
            all_end + cost
        };
        Ok(Outlook {
            ready,
            last,
            all_end,
            cost,
        })
    }

    /// Earliest time not before `from` at which `zone` can be in `status`.
    pub fn earliest(&self, zone: &str, status: usize, from: f64) -> Result<f64, ZoneError> {
        Ok(from.max(self.outlook(zone, status)?.ready))
    }

    /// Records a work holding `zone` in `status` over `[start, end)`, leaving
    /// it in `post`.
    ///
    /// Returns the transitions performed right before `start` and after
    /// `end`. `start` must come from [`earliest`](Self::earliest). A status
    /// change after `end` waits until every other hold on the zone is over.
    pub fn occupy(
        &mut self,
        zone: &str,
        status: usize,
        post: usize,
        start: f64,
        end: f64,
    ) -> Result<(Vec<ZoneTransition>, Vec<ZoneTransition>), ZoneError> {
        let outlook = self.outlook(zone, status)?;
        let post_cost = self.config.time_cost(zone, status, post)?;
        let mut pre = Vec::new();
        let mut after = Vec::new();
        let mut new_holds = Vec::with_capacity(3);

        if outlook.last != status {
            let from = start - outlook.cost;
            new_holds.push(Hold {
                start: from,
                end: start,
                status: outlook.last,
                status_after: status,
                exclusive: true,
            });
            pre.push(ZoneTransition {
                name: zone.to_string(),
                from_status: outlook.last,
                to_status: status,
                interval: Interval::from_f64(from, start),
            });
        }
        new_holds.push(Hold {
            start,
            end,
            status,
            status_after: status,
            exclusive: false,
        });
        if post != status {
            let from = end.max(outlook.all_end);
            new_holds.push(Hold {
                start: from,
                end: from + post_cost,
                status,
                status_after: post,
                exclusive: true,
            });
            after.push(ZoneTransition {
                name: zone.to_string(),
                from_status: status,
                to_status: post,
                interval: Interval::from_f64(from, from + post_cost),
            });
        }

        self.holds
            .entry(zone.to_string())
            .or_default()
            .extend(new_holds);
        Ok((pre, after))
    }
}
