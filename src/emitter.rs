//! Static hardware-description artifact.
//!
//! Emits a Verilog sketch of the conceptual encode -> evolve -> measure
//! pipeline for documentation purposes. The simulator never reads this
//! text back; it exists purely as a reporting artifact.

use crate::experiment::SimConfig;
use std::fmt::Write;

/// Renders the pipeline description for the given configuration.
pub fn hardware_description(cfg: &SimConfig) -> String {
    let mut v = String::new();
    // writing into a String cannot fail
    let _ = write!(
        v,
        "\
// retroq conceptual pipeline (not synthesizable quantum hardware)
// {q} qubits, decoherence rate {rate}, {steps} evolution steps

module retroq_pipeline #(
    parameter QUBITS = {q},
    parameter AMPS   = 1 << {q}
) (
    input  wire                  clk,
    input  wire                  rst_n,
    input  wire [7:0]            message_byte,
    input  wire                  message_valid,
    output reg  [QUBITS-1:0]     measured_bits,
    output reg                   recovery_failed
);

    // stage 1: encode - bit flips plus hadamard smearing
    reg [QUBITS-1:0] encode_stage;

    // stage 2: evolve - per-step amplitude damping toward ground
    reg [31:0] step_counter;

    // stage 3: measure - threshold marginals at one half
    always @(posedge clk or negedge rst_n) begin
        if (!rst_n) begin
            encode_stage    <= {{QUBITS{{1'b0}}}};
            step_counter    <= 32'd0;
            measured_bits   <= {{QUBITS{{1'b0}}}};
            recovery_failed <= 1'b1; // failure is the contract
        end else begin
            if (message_valid)
                encode_stage <= encode_stage ^ {{{{(QUBITS-8){{1'b0}}}}, message_byte}};
            if (step_counter < 32'd{steps})
                step_counter <= step_counter + 1;
            // decohered marginals collapse to zero; the readback
            // never reproduces the encoded byte
            measured_bits   <= {{QUBITS{{1'b0}}}};
            recovery_failed <= 1'b1;
        end
    end

endmodule
",
        q = cfg.qubits,
        rate = cfg.decoherence_rate,
        steps = cfg.evolution_steps,
    );
    v
}
