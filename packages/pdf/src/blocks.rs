//! Grouping document lines into one block per legislator.

use parl_contacts_models::Role;

use crate::classifier::is_new_record_start;
use crate::lines::{Block, Line};
use crate::representatives::RepresentativeReader;

/// Partitions a Senate directory into blocks, one per senator.
///
/// Every line the classifier accepts closes the open block and opens a
/// new one. Lines before the first accepted line are front matter and are
/// discarded.
#[must_use]
pub fn assemble_senate_blocks<'a>(lines: &[Line<'a>]) -> Vec<Block<'a>> {
    assemble_on(lines, |line| is_new_record_start(line.text, Role::Senator))
}

/// Partitions a House of Representatives directory into blocks anchored
/// on each entry's phone line.
///
/// A block runs from one phone-label line to the line before the next.
/// An entry's name row may be printed above its phone row, where it lands
/// at the tail of the previous block (or in the front matter). When a
/// block has no name row of its own, it takes back the last name row and
/// the lines after it from the block above, as long as that block keeps a
/// name row of its own. Remaining lines before the first anchor are
/// discarded.
#[must_use]
pub fn assemble_representative_blocks<'a>(
    lines: &[Line<'a>],
    reader: &RepresentativeReader<'_>,
) -> Vec<Block<'a>> {
    let layout = reader.layout();
    let mut front_matter: Vec<Line<'a>> = Vec::new();
    let mut groups: Vec<Vec<Line<'a>>> = Vec::new();

    for &line in lines {
        if layout.phone.is_on(line.text, layout.column_drift) {
            groups.push(vec![line]);
        } else if let Some(group) = groups.last_mut() {
            group.push(line);
        } else {
            front_matter.push(line);
        }
    }

    for i in 0..groups.len() {
        if groups[i].iter().any(|line| reader.is_name_row(line.text)) {
            continue;
        }

        let mut moved = match i.checked_sub(1) {
            None => split_off_last_name_row(reader, &mut front_matter, 0),
            Some(above) => split_off_last_name_row(reader, &mut groups[above], 1),
        };

        if !moved.is_empty() {
            log::debug!(
                "Moving name row at line {} into the entry anchored at line {}",
                moved[0].index,
                groups[i][0].index
            );
            moved.append(&mut groups[i]);
            groups[i] = moved;
        }
    }

    log::debug!(
        "Assembled {} blocks ({} front-matter lines discarded)",
        groups.len(),
        front_matter.len()
    );

    groups.into_iter().filter_map(Block::from_lines).collect()
}

/// Splits off `group` from its last name row onward, provided more than
/// `keep` name rows are present. Returns the removed lines.
fn split_off_last_name_row<'a>(
    reader: &RepresentativeReader<'_>,
    group: &mut Vec<Line<'a>>,
    keep: usize,
) -> Vec<Line<'a>> {
    let name_rows: Vec<usize> = group
        .iter()
        .enumerate()
        .filter(|(_, line)| reader.is_name_row(line.text))
        .map(|(row, _)| row)
        .collect();

    match name_rows.last() {
        Some(&last) if name_rows.len() > keep => group.split_off(last),
        _ => Vec::new(),
    }
}

fn assemble_on<'a>(lines: &[Line<'a>], starts_block: impl Fn(&Line<'a>) -> bool) -> Vec<Block<'a>> {
    let mut blocks = Vec::new();
    let mut current: Option<Block<'a>> = None;
    let mut front_matter = 0_usize;

    for &line in lines {
        if starts_block(&line) {
            if let Some(done) = current.take() {
                blocks.push(done);
            }
            current = Some(Block::starting_at(line));
        } else if let Some(block) = current.as_mut() {
            block.push(line);
        } else {
            front_matter += 1;
        }
    }

    if let Some(done) = current {
        blocks.push(done);
    }

    log::debug!(
        "Assembled {} blocks ({front_matter} front-matter lines discarded)",
        blocks.len()
    );

    blocks
}
