//! Политики завершения потока записей.
//!
//! Формат версии 4 не хранит ни количества записей, ни маркера конца: прибор
//! дописывает в конец запись, инкремент которой побитно повторяет
//! предыдущий. Это правило вынесено в отдельную политику, чтобы будущие
//! версии с явным счётчиком могли подключить свою.

/// Решение политики по очередной записи.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Запись с данными, выдаётся
    Emit,
    /// Запись-терминатор: поток закончен, запись не выдаётся
    Stop,
}

/// Решает, является ли запись с данным инкрементом концом потока.
pub trait TerminationPolicy {
    /// Вызывается для каждой полностью прочитанной записи до её декодирования.
    fn check(
        &mut self,
        increment: f64,
    ) -> Verdict;

    /// Имя для журналов.
    fn name(&self) -> &'static str;
}

/// Конец потока — первый точный повтор инкремента (политика версии 4).
///
/// Сравнение строго `==` без допуска: терминатор копирует предыдущее
/// значение бит в бит.
#[derive(Debug, Default, Clone)]
pub struct RepeatedIncrement {
    last_increment: Option<f64>,
}

/// Никогда не останавливается по содержимому; поток заканчивается только
/// вместе с входными данными.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExhaustInput;

impl RepeatedIncrement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Последний выданный инкремент (`None` до первой записи).
    pub fn last_increment(&self) -> Option<f64> {
        self.last_increment
    }
}

impl TerminationPolicy for RepeatedIncrement {
    fn check(
        &mut self,
        increment: f64,
    ) -> Verdict {
        if self.last_increment == Some(increment) {
            return Verdict::Stop;
        }

        self.last_increment = Some(increment);
        Verdict::Emit
    }

    fn name(&self) -> &'static str {
        "repeated-increment"
    }
}

impl TerminationPolicy for ExhaustInput {
    fn check(
        &mut self,
        _increment: f64,
    ) -> Verdict {
        Verdict::Emit
    }

    fn name(&self) -> &'static str {
        "exhaust-input"
    }
}

impl<P: TerminationPolicy + ?Sized> TerminationPolicy for Box<P> {
    fn check(
        &mut self,
        increment: f64,
    ) -> Verdict {
        (**self).check(increment)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(
        policy: &mut impl TerminationPolicy,
        increments: &[f64],
    ) -> Vec<f64> {
        let mut emitted = Vec::new();
        for &inc in increments {
            if policy.check(inc) == Verdict::Stop {
                break;
            }
            emitted.push(inc);
        }
        emitted
    }

    #[test]
    fn test_repeat_stops_without_emitting() {
        let mut policy = RepeatedIncrement::new();
        let emitted = run(&mut policy, &[0.0, 1.0, 2.0, 2.0, 3.0]);

        assert_eq!(emitted, vec![0.0, 1.0, 2.0]);
        assert_eq!(policy.last_increment(), Some(2.0));
    }

    #[test]
    fn test_first_record_never_terminates() {
        // Нулевой инкремент первой записи не должен совпасть с начальным
        // состоянием
        let mut policy = RepeatedIncrement::new();
        assert_eq!(policy.check(0.0), Verdict::Emit);
        assert_eq!(policy.check(-1.0), Verdict::Emit);
    }

    #[test]
    fn test_exact_equality_no_epsilon() {
        let mut policy = RepeatedIncrement::new();
        let a = 0.1 + 0.2;
        let b = 0.3;

        assert_eq!(policy.check(a), Verdict::Emit);
        assert_eq!(policy.check(b), Verdict::Emit, "0.1+0.2 != 0.3 побитно");
        assert_eq!(policy.check(b), Verdict::Stop);
    }

    #[test]
    fn test_non_adjacent_repeat_does_not_stop() {
        let mut policy = RepeatedIncrement::new();
        let emitted = run(&mut policy, &[0.0, 1.0, 0.0, 1.0]);
        assert_eq!(emitted.len(), 4);
    }

    #[test]
    fn test_nan_never_matches() {
        let mut policy = RepeatedIncrement::new();
        assert_eq!(policy.check(f64::NAN), Verdict::Emit);
        assert_eq!(policy.check(f64::NAN), Verdict::Emit);
    }

    #[test]
    fn test_exhaust_input_emits_everything() {
        let mut policy = ExhaustInput;
        let emitted = run(&mut policy, &[5.0, 5.0, 5.0]);
        assert_eq!(emitted.len(), 3);
    }

    #[test]
    fn test_boxed_policy() {
        let mut policy: Box<dyn TerminationPolicy> = Box::new(RepeatedIncrement::new());
        assert_eq!(policy.name(), "repeated-increment");
        assert_eq!(policy.check(1.0), Verdict::Emit);
        assert_eq!(policy.check(1.0), Verdict::Stop);
    }
}
