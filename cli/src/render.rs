use gemmines_protocol::{CellView, RoundView};

fn glyph(cell: CellView) -> char {
    match cell {
        CellView::Hidden => '.',
        CellView::Gem => 'o',
        CellView::Mine => 'X',
    }
}

pub fn board(view: &RoundView) -> String {
    let mut text = String::from("   ");
    for col in 0..view.cells.len() {
        text.push_str(&format!(" {}", col));
    }
    text.push('\n');

    for (row, cells) in view.cells.iter().enumerate() {
        text.push_str(&format!("{:>2} ", row));
        for &cell in cells {
            text.push(' ');
            text.push(glyph(cell));
        }
        text.push('\n');
    }
    text
}

pub fn stats(view: &RoundView) -> String {
    format!(
        "bet {} | mines {} | gems {} | {:.2}x | profit {} | next mine {}%",
        view.bet_amount,
        view.mines,
        view.revealed_safe_count,
        view.multiplier,
        view.profit,
        view.mine_chance
    )
}
