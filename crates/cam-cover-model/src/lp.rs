//! CPLEX LP export.
//!
//! Labels contain commas and start with a digit, which LP readers reject as
//! identifiers, so variables are written as `x<index>` and constraints as
//! `p<piece>`. The label of every variable is kept in a leading comment.

use crate::model::CoverModel;
use std::io::{self, Write};

const TERMS_PER_LINE: usize = 8;

pub(crate) fn var_name(index: usize) -> String {
    format!("x{index}")
}

/// Parse a name written by [`write_lp`] back into a variable index.
pub(crate) fn var_index(name: &str) -> Option<usize> {
    name.strip_prefix('x')?.parse().ok()
}

fn write_terms<W, I>(out: &mut W, terms: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = String>,
{
    for (k, term) in terms.into_iter().enumerate() {
        if k > 0 {
            if k % TERMS_PER_LINE == 0 {
                write!(out, "\n   ")?;
            }
            write!(out, " +")?;
        }
        write!(out, " {term}")?;
    }
    Ok(())
}

/// Write `model` as a CPLEX LP minimisation problem with binary variables.
pub fn write_lp<W: Write>(model: &CoverModel, mut out: W) -> io::Result<()> {
    writeln!(out, "\\ camera covering model")?;
    writeln!(
        out,
        "\\ {} variables, {} constraints",
        model.variables().len(),
        model.constraints().len()
    )?;
    for (i, v) in model.variables().iter().enumerate() {
        writeln!(out, "\\ {} = {}", var_name(i), v.name)?;
    }

    writeln!(out, "Minimize")?;
    write!(out, " obj:")?;
    if model.variables().is_empty() {
        write!(out, " 0")?;
    } else {
        write_terms(
            &mut out,
            model
                .variables()
                .iter()
                .enumerate()
                .map(|(i, v)| format!("{} {}", v.cost, var_name(i))),
        )?;
    }
    writeln!(out)?;

    writeln!(out, "Subject To")?;
    for c in model.constraints() {
        write!(out, " p{}:", c.piece)?;
        write_terms(&mut out, c.members.iter().map(|&m| var_name(m)))?;
        writeln!(out, " >= 1")?;
    }

    if !model.variables().is_empty() {
        writeln!(out, "Binary")?;
        for i in 0..model.variables().len() {
            writeln!(out, " {}", var_name(i))?;
        }
    }
    writeln!(out, "End")?;
    out.flush()
}
