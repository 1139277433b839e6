use engine::board::Position;
use engine::search::{try_find_tour_with, SearchLimits, Tour};
use engine::TourResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Waiting,
    Running,
    Done,
    NoTour,
}

impl Status {
    pub fn message(&self) -> &'static str {
        match self {
            Status::Waiting => "Click a cell to start...",
            Status::Running => "Running tour...",
            Status::Done => "The tour is done...",
            Status::NoTour => "No tour exist",
        }
    }
}

pub struct TourSession {
    size: i32,
    limits: SearchLimits,
    tour: Option<Tour>,
    shown: usize, // 已经走出的步数
    status: Status,
    locked: bool, // 选过起点后不能再点，直到 reset
}

impl TourSession {
    pub fn new(size: i32, limits: SearchLimits) -> Self {
        TourSession {
            size,
            limits,
            tour: None,
            shown: 0,
            status: Status::Waiting,
            locked: false,
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn tour(&self) -> Option<&Tour> {
        self.tour.as_ref()
    }

    // 点击格子：搜索从这里出发的路径
    // 返回 false 表示这次点击被忽略
    pub fn click(&mut self, pos: Position) -> TourResult<bool> {
        if self.locked {
            return Ok(false);
        }
        let tour = try_find_tour_with(self.size, pos, self.limits)?;
        self.locked = true;
        self.shown = 0;
        self.status = if tour.is_some() {
            Status::Running
        } else {
            Status::NoTour
        };
        self.tour = tour;
        Ok(true)
    }

    // 走下一步，返回刚走到的格子
    pub fn advance(&mut self) -> Option<Position> {
        let tour = self.tour.as_ref()?;
        let next = *tour.positions().get(self.shown)?;
        self.shown += 1;
        if self.shown == tour.len() {
            self.status = Status::Done;
        }
        Some(next)
    }

    pub fn current(&self) -> Option<Position> {
        let tour = self.tour.as_ref()?;
        self.shown.checked_sub(1).map(|i| tour.positions()[i])
    }

    pub fn visited(&self) -> &[Position] {
        match &self.tour {
            Some(tour) => &tour.positions()[..self.shown],
            None => &[],
        }
    }

    /// Shows every move at once.
    pub fn finish(&mut self) {
        while self.advance().is_some() {}
    }

    pub fn reset(&mut self) {
        self.tour = None;
        self.shown = 0;
        self.status = Status::Waiting;
        self.locked = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> TourSession {
        TourSession::new(5, SearchLimits::default())
    }

    #[test]
    fn test_click_and_play() {
        let mut game = session();
        assert_eq!(game.status(), Status::Waiting);
        assert!(game.click(Position::new(0, 0)).unwrap());
        assert_eq!(game.status(), Status::Running);
        assert_eq!(game.current(), None);

        assert_eq!(game.advance(), Some(Position::new(0, 0)));
        assert_eq!(game.advance(), Some(Position::new(1, 2)));
        assert_eq!(game.current(), Some(Position::new(1, 2)));
        assert_eq!(game.visited().len(), 2);

        game.finish();
        assert_eq!(game.status(), Status::Done);
        assert_eq!(game.visited().len(), 25);
        assert_eq!(game.current(), Some(Position::new(4, 4)));
        assert_eq!(game.advance(), None);
    }

    #[test]
    fn test_second_click_ignored_until_reset() {
        let mut game = session();
        assert!(game.click(Position::new(0, 0)).unwrap());
        assert!(!game.click(Position::new(2, 2)).unwrap());
        assert_eq!(game.tour().map(|t| t.start()), Some(Position::new(0, 0)));

        game.reset();
        assert_eq!(game.status(), Status::Waiting);
        assert!(game.click(Position::new(2, 2)).unwrap());
        assert_eq!(game.tour().map(|t| t.start()), Some(Position::new(2, 2)));
    }

    #[test]
    fn test_no_tour() {
        let mut game = session();
        assert!(game.click(Position::new(0, 1)).unwrap());
        assert_eq!(game.status(), Status::NoTour);
        assert_eq!(game.status().message(), "No tour exist");
        assert_eq!(game.advance(), None);
        assert!(game.visited().is_empty());
    }

    #[test]
    fn test_click_outside_board() {
        let mut game = session();
        assert!(game.click(Position::new(5, 5)).is_err());
        // 出错不算点过
        assert!(game.click(Position::new(0, 0)).unwrap());
    }
}
