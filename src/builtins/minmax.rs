//! `min` and `max`

use crate::errors::{Exception, RtResult};
use crate::objects::{is_none, FuncArgs, ObjRef};
use crate::protocol::{self, CompareOp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    Min,
    Max,
}

impl Extremum {
    const fn name(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    /// Strict, so the first-seen candidate wins a tie
    const fn op(self) -> CompareOp {
        match self {
            Self::Min => CompareOp::Lt,
            Self::Max => CompareOp::Gt,
        }
    }
}

/// Best of `items` under `key`, or `None` when there are none
fn select<I>(items: I, key: Option<&ObjRef>, which: Extremum) -> RtResult<Option<ObjRef>>
where
    I: IntoIterator<Item = RtResult<ObjRef>>,
{
    let mut best: Option<(ObjRef, ObjRef)> = None;
    for item in items {
        let item = item?;
        let rank = match key {
            Some(key) => protocol::call(key, &[item.clone()])?,
            None => item.clone(),
        };
        let replace = match &best {
            None => true,
            Some((best_rank, _)) => protocol::rich_compare(&rank, best_rank, which.op())?,
        };
        if replace {
            best = Some((rank, item));
        }
    }
    Ok(best.map(|(_, item)| item))
}

/// `min`/`max` over one iterable or over 2+ positional values
///
/// `default` is only accepted with the single-iterable form.
pub fn extremum(
    values: &[ObjRef],
    key: Option<ObjRef>,
    default: Option<ObjRef>,
    which: Extremum,
) -> RtResult<ObjRef> {
    let name = which.name();
    let key = key.filter(|k| !is_none(k));

    let found = match values {
        [] => {
            return Err(Exception::type_error(format!(
                "{} expected at least 1 argument, got 0",
                name
            )))
        }
        [iterable] => select(protocol::iterate(iterable)?, key.as_ref(), which)?,
        _ => {
            if default.is_some() {
                return Err(Exception::type_error(format!(
                    "Cannot specify a default for {}() with multiple positional arguments",
                    name
                )));
            }
            select(values.iter().cloned().map(Ok), key.as_ref(), which)?
        }
    };

    match (found, default) {
        (Some(best), _) => Ok(best),
        (None, Some(default)) => Ok(default),
        (None, None) => Err(Exception::value_error(format!(
            "{}() arg is an empty sequence",
            name
        ))),
    }
}

pub fn min(values: &[ObjRef], key: Option<ObjRef>, default: Option<ObjRef>) -> RtResult<ObjRef> {
    extremum(values, key, default, Extremum::Min)
}

pub fn max(values: &[ObjRef], key: Option<ObjRef>, default: Option<ObjRef>) -> RtResult<ObjRef> {
    extremum(values, key, default, Extremum::Max)
}

fn builtin(mut args: FuncArgs, which: Extremum) -> RtResult<ObjRef> {
    let key = args.take_keyword("key");
    let default = args.take_keyword("default");
    args.check_kwargs_empty(which.name())?;
    extremum(&args.args, key, default, which)
}

pub(super) fn builtin_min(args: FuncArgs) -> RtResult<ObjRef> {
    builtin(args, Extremum::Min)
}

pub(super) fn builtin_max(args: FuncArgs) -> RtResult<ObjRef> {
    builtin(args, Extremum::Max)
}
