//! `lopdns --action get-zones` - list zones.

use super::Context;
use crate::error::CommandError;
use crate::output;

/// Print the target zones
pub fn get_zones(ctx: &Context, zones: &[String]) -> Result<(), CommandError> {
    output::print_zones(zones, ctx.settings.output_format)?;
    Ok(())
}
