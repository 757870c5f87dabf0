//! Applies machine-readable fixes to a working copy of the document.
//!
//! Atomicity is per fix, not per run: each fix's changes execute in declared
//! order against a scratch copy that is committed to the working document
//! only when every change applies. A failed fix leaves the working document
//! exactly as the previous successful fix left it; fixes applied earlier in
//! the run are never rolled back. Fixes are independent by construction
//! (each targets a disjoint finding), so the fixer favors maximal partial
//! success over all-or-nothing semantics.

use serde_json::{Map, Value};

use crate::finding::{ChangeOp, ChangeResult, Finding, FixResult, FixSummary, SpecChange};
use crate::model::json_type_name;
use crate::pointer::{Pointer, Segment};

/// Options for one fixer run.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixOptions {
    /// Compute and validate every change, then discard the result. The
    /// working document is left untouched.
    pub dry_run: bool,
}

/// Holds the working copy and applies fixes to it.
pub struct Fixer {
    spec: Value,
    results: Vec<FixResult>,
}

impl Fixer {
    /// Copy the caller's document; the original is never touched.
    pub fn new(spec: &Value) -> Self {
        Fixer {
            spec: spec.clone(),
            results: Vec::new(),
        }
    }

    /// Apply the fixes carried by `findings`, in order. Findings without a
    /// fix are ignored; reporting them as unfixable is the caller's job.
    ///
    /// Each returned [`FixResult`] records one attempted change per entry;
    /// changes skipped after an earlier failure in the same fix are not
    /// attempted and not recorded.
    pub fn apply_fixes(&mut self, findings: &[Finding], options: &FixOptions) -> Vec<FixResult> {
        let mut working = if options.dry_run {
            self.spec.clone()
        } else {
            std::mem::take(&mut self.spec)
        };

        let mut run_results = Vec::new();
        for finding in findings {
            let Some(fix) = &finding.fix else {
                continue;
            };

            let mut scratch = working.clone();
            let mut changes = Vec::new();
            let mut failed = false;
            for change in &fix.spec_changes {
                match apply_change(&mut scratch, change) {
                    Ok(()) => changes.push(ChangeResult {
                        applied: true,
                        error: None,
                    }),
                    Err(message) => {
                        changes.push(ChangeResult {
                            applied: false,
                            error: Some(message),
                        });
                        failed = true;
                        break;
                    }
                }
            }

            if !failed {
                working = scratch;
            }
            run_results.push(FixResult {
                rule_id: finding.rule_id.clone(),
                applied: !failed,
                changes,
            });
        }

        if !options.dry_run {
            self.spec = working;
        }
        self.results.extend(run_results.clone());
        run_results
    }

    /// Aggregate over every fix attempted by this instance, dry runs
    /// included.
    pub fn summary(&self) -> FixSummary {
        FixSummary {
            applied: self.results.iter().filter(|r| r.applied).count(),
            failed: self.results.iter().filter(|r| !r.applied).count(),
            changes: self.results.iter().map(|r| r.changes.len()).sum(),
        }
    }

    /// The working document in its current state.
    pub fn spec(&self) -> &Value {
        &self.spec
    }

    /// Consume the fixer, yielding the working document.
    pub fn into_spec(self) -> Value {
        self.spec
    }
}

/// Execute one atomic change against the document.
fn apply_change(root: &mut Value, change: &SpecChange) -> Result<(), String> {
    match change.op {
        ChangeOp::RenameKey => rename_key(root, change),
        ChangeOp::Set => set(root, change),
        ChangeOp::Add => add(root, change),
        ChangeOp::Remove => remove(root, change),
        ChangeOp::Merge => merge(root, change),
    }
}

fn required_value<'a>(change: &'a SpecChange) -> Result<&'a Value, String> {
    change
        .value
        .as_ref()
        .ok_or_else(|| format!("{:?} change at {} carries no value", change.op, change.path))
}

/// Move `from` to `to` inside the mapping at `path`, keeping every entry in
/// its original position.
fn rename_key(root: &mut Value, change: &SpecChange) -> Result<(), String> {
    let from = change
        .from
        .as_deref()
        .ok_or_else(|| format!("rename-key at {} carries no 'from' key", change.path))?;
    let to = change
        .to
        .as_deref()
        .ok_or_else(|| format!("rename-key at {} carries no 'to' key", change.path))?;

    let container = change
        .path
        .resolve_mut(root)
        .ok_or_else(|| format!("path {} not found", change.path))?;
    let map = container
        .as_object_mut()
        .ok_or_else(|| format!("path {} is not a mapping", change.path))?;

    if !map.contains_key(from) {
        return Err(format!("key '{}' not found at {}", from, change.path));
    }
    if map.contains_key(to) {
        return Err(format!("key '{}' already exists at {}", to, change.path));
    }

    let entries = std::mem::take(map);
    for (key, value) in entries {
        let key = if key == from { to.to_string() } else { key };
        map.insert(key, value);
    }
    Ok(())
}

/// Replace (or insert) the value at `path`. The parent must already exist.
fn set(root: &mut Value, change: &SpecChange) -> Result<(), String> {
    let value = required_value(change)?.clone();
    let (parent_pointer, last) = change
        .path
        .split_last()
        .ok_or("cannot set the document root")?;
    let parent = parent_pointer
        .resolve_mut(root)
        .ok_or_else(|| format!("parent {} not found", parent_pointer))?;

    match (parent, last) {
        (Value::Object(map), segment) => {
            map.insert(segment.as_key(), value);
            Ok(())
        }
        (Value::Array(arr), Segment::Index(i)) => {
            if *i >= arr.len() {
                return Err(format!("index {} out of bounds at {}", i, parent_pointer));
            }
            arr[*i] = value;
            Ok(())
        }
        (other, _) => Err(format!(
            "parent {} is a {}, not a container",
            parent_pointer,
            json_type_name(other)
        )),
    }
}

/// Insert a value at a location that must not exist yet. The direct parent
/// mapping is created if missing; deeper ancestors must exist, so a fix
/// whose target was moved by an earlier, unrelated fix fails instead of
/// silently rebuilding the old structure. Appending to a sequence addresses
/// the index one past its end.
fn add(root: &mut Value, change: &SpecChange) -> Result<(), String> {
    let value = required_value(change)?.clone();
    let (parent_pointer, last) = change
        .path
        .split_last()
        .ok_or("cannot add at the document root")?;
    let parent = ensure_parent(root, &parent_pointer)?;

    match (parent, last) {
        (Value::Object(map), segment) => {
            let key = segment.as_key();
            if map.contains_key(&key) {
                return Err(format!("key '{}' already exists at {}", key, parent_pointer));
            }
            map.insert(key, value);
            Ok(())
        }
        (Value::Array(arr), Segment::Index(i)) => {
            if *i < arr.len() {
                return Err(format!(
                    "index {} already occupied at {}",
                    i, parent_pointer
                ));
            }
            if *i > arr.len() {
                return Err(format!("index {} out of bounds at {}", i, parent_pointer));
            }
            arr.push(value);
            Ok(())
        }
        (other, _) => Err(format!(
            "parent {} is a {}, not a container",
            parent_pointer,
            json_type_name(other)
        )),
    }
}

/// Walk to the parent container, synthesizing at most its final mapping key.
/// Every ancestor above the parent must already exist.
fn ensure_parent<'a>(root: &'a mut Value, pointer: &Pointer) -> Result<&'a mut Value, String> {
    let Some((grandparent_pointer, last)) = pointer.split_last() else {
        return Ok(root);
    };
    let grandparent = grandparent_pointer
        .resolve_mut(root)
        .ok_or_else(|| format!("parent {} not found", grandparent_pointer))?;
    match (grandparent, last) {
        (Value::Object(map), segment) => Ok(map
            .entry(segment.as_key())
            .or_insert_with(|| Value::Object(Map::new()))),
        (Value::Array(arr), Segment::Index(i)) => arr
            .get_mut(*i)
            .ok_or_else(|| format!("index {} not found at {}", i, pointer)),
        (other, _) => Err(format!(
            "{} is a {}, not a container",
            grandparent_pointer,
            json_type_name(other)
        )),
    }
}

/// Delete the addressed location. Absence is success, so re-applying the
/// same removal stays a no-op.
fn remove(root: &mut Value, change: &SpecChange) -> Result<(), String> {
    let (parent_pointer, last) = change
        .path
        .split_last()
        .ok_or("cannot remove the document root")?;
    let Some(parent) = parent_pointer.resolve_mut(root) else {
        return Ok(());
    };

    match (parent, last) {
        (Value::Object(map), segment) => {
            map.shift_remove(&segment.as_key());
            Ok(())
        }
        (Value::Array(arr), Segment::Index(i)) => {
            if *i < arr.len() {
                arr.remove(*i);
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Shallow-merge an object into the mapping at `path`, incoming keys
/// winning on conflict.
fn merge(root: &mut Value, change: &SpecChange) -> Result<(), String> {
    let value = required_value(change)?;
    let incoming = value
        .as_object()
        .ok_or_else(|| format!("merge value at {} is not a mapping", change.path))?
        .clone();

    let target = change
        .path
        .resolve_mut(root)
        .ok_or_else(|| format!("path {} not found", change.path))?;
    let map = target
        .as_object_mut()
        .ok_or_else(|| format!("path {} is not a mapping", change.path))?;

    for (key, value) in incoming {
        map.insert(key, value);
    }
    Ok(())
}
