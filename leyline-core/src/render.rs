//! ASCII board rendering
//!
//! Each size has a fixed template. `{A}` style tokens are replaced by the
//! cell's marker (its letter while unclaimed, else the owner's `1`/`2`) and
//! `{/1}` style tokens by the ley-line's marker (`@` while unowned).

use std::fmt;

use crate::board::{Axis, Cell, LeyLineId};
use crate::game::{GameState, Player, UNOWNED_LINE};

const SIZE_1: &str = r"      {/1}   {/2}
     /   /
{-1} - {A} - {B}
     \ / \
  {-2} - {C}   {\2}
       \
        {\1}";

const SIZE_2: &str = r"        {/1}   {/2}
       /   /
  {-1} - {A} - {B}   {/3}
     / \ / \ /
{-2} - {C} - {D} - {E}
     \ / \ / \
  {-3} - {F} - {G}   {\3}
       \   \
        {\1}   {\2}";

const SIZE_3: &str = r"          {/1}   {/2}
         /   /
    {-1} - {A} - {B}   {/3}
       / \ / \ /
  {-2} - {C} - {D} - {E}   {/4}
     / \ / \ / \ /
{-3} - {F} - {G} - {H} - {I}
     \ / \ / \ / \
  {-4} - {J} - {K} - {L}   {\4}
       \   \   \
        {\1}   {\2}   {\3}";

const SIZE_4: &str = r"            {/1}   {/2}
           /   /
      {-1} - {A} - {B}   {/3}
         / \ / \ /
    {-2} - {C} - {D} - {E}   {/4}
       / \ / \ / \ /
  {-3} - {F} - {G} - {H} - {I}   {/5}
     / \ / \ / \ / \ /
{-4} - {J} - {K} - {L} - {M} - {N}
     \ / \ / \ / \ / \
  {-5} - {O} - {P} - {Q} - {R}   {\5}
       \   \   \   \
        {\1}   {\2}   {\3}   {\4}";

const SIZE_5: &str = r"              {/1}   {/2}
             /   /
        {-1} - {A} - {B}   {/3}
           / \ / \ /
      {-2} - {C} - {D} - {E}   {/4}
         / \ / \ / \ /
    {-3} - {F} - {G} - {H} - {I}   {/5}
       / \ / \ / \ / \ /
  {-4} - {J} - {K} - {L} - {M} - {N}   {/6}
     / \ / \ / \ / \ / \ /
{-5} - {O} - {P} - {Q} - {R} - {S} - {T}
     \ / \ / \ / \ / \ / \
  {-6} - {U} - {V} - {W} - {X} - {Y}   {\6}
       \   \   \   \   \
        {\1}   {\2}   {\3}   {\4}   {\5}";

fn template(size: u8) -> &'static str {
    match size {
        1 => SIZE_1,
        2 => SIZE_2,
        3 => SIZE_3,
        4 => SIZE_4,
        _ => SIZE_5,
    }
}

impl GameState {
    /// Marker for a template token: a cell letter or a ley-line id
    fn marker(&self, token: &str) -> char {
        let mut chars = token.chars();
        let Some(first) = chars.next() else {
            return ' ';
        };
        if let Some(axis) = Axis::from_symbol(first) {
            let owner = chars
                .as_str()
                .parse::<u8>()
                .ok()
                .and_then(|number| self.line_owner(LeyLineId::new(axis, number)));
            return owner.map_or(UNOWNED_LINE, Player::marker);
        }
        match Cell::from_letter(first) {
            Some(cell) => self.cell_owner(cell).map_or(cell.letter(), Player::marker),
            None => ' ',
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rest = template(self.size().get());
        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}').map(|i| open + i) else {
                break;
            };
            f.write_str(&rest[..open])?;
            write!(f, "{}", self.marker(&rest[open + 1..close]))?;
            rest = &rest[close + 1..];
        }
        f.write_str(rest)
    }
}
