#![no_main]
#![no_std]

use lib as _;

use cortex_m::peripheral::SYST;
use cortex_m::singleton;
use lib::channel::Channel;
use lib::dispatcher::Dispatcher;
use lib::hw::{
    init_clock, init_lcd, ButtonA, ButtonB, ButtonC, ButtonD, ButtonIrq, ExtiButton, ExtiError,
    HwLcd, IliError, LcdInterface,
};
use lib::latch::EdgeLatchBank;
use lib::startup::{init_display, init_inputs};
use rtic::app;
use stm32g0xx_hal::delay::DelayExt;
use stm32g0xx_hal::gpio::{GpioExt, Speed};
use stm32g0xx_hal::timer::delay::Delay;

#[app(device = stm32g0xx_hal::stm32, peripherals = true)]
const APP: () = {
    struct Resources {
        dispatcher: Dispatcher<'static, HwLcd>,
        delay: Delay<SYST>,
        button_irq: ButtonIrq,
        latches: &'static EdgeLatchBank,
    }

    #[init]
    fn init(cx: init::Context) -> init::LateResources {
        let core: rtic::export::Peripherals = cx.core;
        let device: stm32g0xx_hal::stm32::Peripherals = cx.device;

        // Edge latches shared by the EXTI handlers and the main loop
        let latches: &'static EdgeLatchBank =
            singleton!(: EdgeLatchBank = EdgeLatchBank::new()).unwrap();

        // Clock
        let mut rcc = init_clock(device.RCC);
        let mut delay = core.SYST.delay(&mut rcc);

        // GPIO
        let gpioa = device.GPIOA.split(&mut rcc);
        let gpiob = device.GPIOB.split(&mut rcc);
        let gpioc = device.GPIOC.split(&mut rcc);

        // Buttons, interrupts stay masked until init returns
        let mut button_a: ButtonA = ExtiButton::new(gpioc.pc0, Channel::A);
        let mut button_b: ButtonB = ExtiButton::new(gpioc.pc1, Channel::B);
        let mut button_c: ButtonC = ExtiButton::new(gpioc.pc2, Channel::C);
        let mut button_d: ButtonD = ExtiButton::new(gpioc.pc3, Channel::D);
        if let Err(error) = init_inputs::<ExtiError, IliError>([
            &mut button_a,
            &mut button_b,
            &mut button_c,
            &mut button_d,
        ]) {
            lib::abort(error);
        }
        let button_irq = ButtonIrq::new(device.EXTI);

        // LCD
        let interface = LcdInterface::new(
            gpiob.pb0.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb1.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb2.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb3.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb4.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb5.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb6.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb7.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb8.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb9.into_push_pull_output().set_speed(Speed::VeryHigh),
        );
        let lcd = init_lcd(
            interface,
            gpioa.pa4.into_push_pull_output(),
            gpioa.pa5.into_push_pull_output(),
            gpioa.pa7.into_push_pull_output(),
            &mut delay,
        );
        let display = match init_display(lcd) {
            Ok(display) => display,
            Err(error) => lib::abort(error),
        };

        init::LateResources {
            dispatcher: Dispatcher::new(latches, display),
            delay,
            button_irq,
            latches,
        }
    }

    #[idle(resources = [dispatcher, delay])]
    fn idle(cx: idle::Context) -> ! {
        let dispatcher: &mut Dispatcher<'static, HwLcd> = cx.resources.dispatcher;
        let delay: &mut Delay<SYST> = cx.resources.delay;

        dispatcher.run(delay)
    }

    #[task(binds = EXTI0_1, priority = 2, resources = [button_irq, latches])]
    fn exti0_1(cx: exti0_1::Context) {
        let irq: &mut ButtonIrq = cx.resources.button_irq;
        let latches: &EdgeLatchBank = cx.resources.latches;

        irq.latch_pending(latches, Channel::A);
        irq.latch_pending(latches, Channel::B);
    }

    #[task(binds = EXTI2_3, priority = 2, resources = [button_irq, latches])]
    fn exti2_3(cx: exti2_3::Context) {
        let irq: &mut ButtonIrq = cx.resources.button_irq;
        let latches: &EdgeLatchBank = cx.resources.latches;

        irq.latch_pending(latches, Channel::C);
        irq.latch_pending(latches, Channel::D);
    }
};
