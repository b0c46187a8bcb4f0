//! Pointer chain walker.
//!
//! Starting at a seed address, repeatedly classify the current address by
//! the region containing it and either stop or dereference:
//!
//! - an address already visited ends the chain as a cycle;
//! - an address in no region ends the chain as an unmapped tail (or fails
//!   the walk, when it is the seed itself);
//! - an address in an executable region is described by the code resolver
//!   and ends the chain as a code tail. Pointer-shaped words inside code are
//!   usually instruction bytes or constants, so they are never followed;
//! - anything else is read as a pointer and the walk continues at the value.
//!
//! The walk has no length cap of its own. `walk_with_deadline` bounds it
//! by wall-clock time instead.

use std::collections::HashSet;
use tracing::{debug, error, info, info_span};

use crate::analysis::code::CodeResolver;
use crate::analysis::memory::PointerReader;
use crate::core::catalog::RegionCatalog;
use crate::core::chain::{ChainNode, PointerChain, Resolved, Termination};
use crate::error::{InspectError, Result};
use crate::timeout::Deadline;

/// Walk the pointer chain starting at `seed`.
///
/// Fails with `AddressNotMapped` if `seed` is in no region, `ReadFailed` if a
/// mapped, non-executable address cannot be read, and `Disassembly` if the
/// code resolver cannot describe an executable address. No partial chain is
/// returned on failure.
pub fn walk<R, C>(seed: u64, catalog: &RegionCatalog, reader: &R, code: &C) -> Result<PointerChain>
where
    R: PointerReader + ?Sized,
    C: CodeResolver + ?Sized,
{
    walk_inner(seed, catalog, reader, code, None)
}

/// Same as [`walk`], polling `deadline` before every step.
pub fn walk_with_deadline<R, C>(
    seed: u64,
    catalog: &RegionCatalog,
    reader: &R,
    code: &C,
    deadline: &mut Deadline,
) -> Result<PointerChain>
where
    R: PointerReader + ?Sized,
    C: CodeResolver + ?Sized,
{
    walk_inner(seed, catalog, reader, code, Some(deadline))
}

fn walk_inner<R, C>(
    seed: u64,
    catalog: &RegionCatalog,
    reader: &R,
    code: &C,
    mut deadline: Option<&mut Deadline>,
) -> Result<PointerChain>
where
    R: PointerReader + ?Sized,
    C: CodeResolver + ?Sized,
{
    let span = info_span!("walk", seed = format_args!("{:#x}", seed));
    let _guard = span.enter();

    let mut nodes: Vec<ChainNode> = Vec::new();
    let mut visited: HashSet<u64> = HashSet::new();
    let mut current = seed;

    let terminated_by = loop {
        if let Some(deadline) = deadline.as_deref_mut() {
            deadline.check()?;
        }

        if visited.contains(&current) {
            break Termination::Cycle;
        }

        let region = match catalog.find(current) {
            Ok(region) => region,
            Err(err) if nodes.is_empty() => {
                debug!("seed is not mapped");
                return Err(err);
            }
            Err(_) => break Termination::UnmappedTail,
        };

        debug!(
            address = format_args!("{:#x}", current),
            region = %region,
            hop = nodes.len(),
            "step"
        );

        if region.perms.has_execute() {
            let location = code
                .disassemble(current)
                .map_err(|source| InspectError::Disassembly {
                    address: current,
                    source,
                })?;
            nodes.push(ChainNode {
                address: current,
                region: region.clone(),
                resolved: Resolved::Code(location),
            });
            break Termination::CodeTail;
        }

        let value = reader.read_pointer(current).map_err(|source| {
            error!(address = format_args!("{:#x}", current), error = %source, "pointer read failed");
            InspectError::ReadFailed {
                address: current,
                source,
            }
        })?;

        visited.insert(current);
        nodes.push(ChainNode {
            address: current,
            region: region.clone(),
            resolved: Resolved::Pointer(value),
        });
        current = value;
    };

    info!(hops = nodes.len(), terminated_by = %terminated_by, "walk finished");
    PointerChain::new(nodes, terminated_by).ok_or(InspectError::AddressNotMapped(seed))
}
